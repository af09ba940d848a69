//! Built-in demo input so the dashboard can be tried without real documents.

use crate::models::ResumePayload;

pub const SAMPLE_RESUME_FILE_NAME: &str = "sample_resume.txt";

pub const SAMPLE_JOB_DESCRIPTION: &str = "Senior Frontend Engineer

Requirements:
- 5+ years of experience with React and TypeScript.
- Deep understanding of modern frontend build tools (Vite, Webpack).
- Experience designing scalable component libraries.
- Proficiency in state management (Redux, Zustand, or Context).
- Knowledge of cloud platforms (AWS/GCP) and CI/CD pipelines.
- Experience with unit and integration testing (Jest, Cypress).
- Strong communication skills and ability to mentor juniors.";

pub const SAMPLE_RESUME: &str = "ALEX RIVERA
Frontend Developer

Summary:
Motivated developer with 3 years of experience building web applications. Passionate about UI/UX and clean code.

Experience:
Web Developer | TechStart Inc. (2021-Present)
- Built internal dashboards using React and JavaScript.
- Managed global state using Redux Toolkit.
- Collaborated with backend team to integrate REST APIs.
- Improved site performance by optimizing images and lazy loading components.

Skills:
- JavaScript (ES6+), React, HTML5, CSS3, Tailwind CSS
- Git, npm, Basic Webpack
- Agile/Scrum methodologies

Education:
B.S. Computer Science, State University";

pub fn sample_resume_payload() -> ResumePayload {
    ResumePayload::text(SAMPLE_RESUME)
}
