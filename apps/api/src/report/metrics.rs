//! Static glyph-width table for the built-in Helvetica face.
//!
//! Widths are in 1/1000 em, taken from the standard Helvetica AFM and covering ASCII
//! 0x20..=0x7E (95 printable characters). Index = (char as usize) - 32.
//! Bold text is measured with the regular table; header cells are short enough that
//! the difference never changes a wrap decision in practice.

/// Points to millimetres.
pub const PT_TO_MM: f32 = 0.352_778;

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0    1    2    3    4    5    6    7    8    9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

/// Fallback for anything outside the table.
const AVERAGE_WIDTH: u16 = 556;

fn char_width(c: char) -> u16 {
    let code = c as usize;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[code - 32]
    } else {
        AVERAGE_WIDTH
    }
}

/// Rendered width of `s` in millimetres at `size_pt`.
pub fn measure_mm(s: &str, size_pt: f32) -> f32 {
    let units: u32 = s.chars().map(|c| u32::from(char_width(c))).sum();
    units as f32 / 1000.0 * size_pt * PT_TO_MM
}

/// Greedy word wrap to `max_width_mm`. Words wider than a whole line (URLs, mostly)
/// are broken between characters. Blank input yields no lines.
pub fn wrap_to_width(text: &str, max_width_mm: f32, size_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let candidate = if current_line.is_empty() {
            word.to_string()
        } else {
            format!("{current_line} {word}")
        };

        if measure_mm(&candidate, size_pt) <= max_width_mm {
            current_line = candidate;
            continue;
        }

        if !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
        }

        if measure_mm(word, size_pt) <= max_width_mm {
            current_line = word.to_string();
        } else {
            for c in word.chars() {
                current_line.push(c);
                if measure_mm(&current_line, size_pt) > max_width_mm && current_line.chars().count() > 1 {
                    current_line.pop();
                    lines.push(std::mem::take(&mut current_line));
                    current_line.push(c);
                }
            }
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_has_no_width() {
        assert_eq!(measure_mm("", 10.0), 0.0);
        assert!(wrap_to_width("   ", 50.0, 10.0).is_empty());
    }

    #[test]
    fn test_width_scales_with_font_size() {
        let small = measure_mm("Executive Summary", 10.0);
        let large = measure_mm("Executive Summary", 20.0);
        assert!((large - 2.0 * small).abs() < 0.001);
    }

    #[test]
    fn test_narrow_glyphs_are_narrower() {
        assert!(measure_mm("iiii", 10.0) < measure_mm("MMMM", 10.0));
    }

    #[test]
    fn test_wrapped_lines_fit_width() {
        let text = "Strong React fundamentals with production experience, but TypeScript \
                    exposure is limited to small side projects and tooling knowledge is thin.";
        let lines = wrap_to_width(text, 60.0, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(measure_mm(line, 10.0) <= 60.0, "{line} overflows");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_long_word_is_broken() {
        let url = "https://www.typescriptlang.org/docs/handbook/2/everyday-types.html";
        let lines = wrap_to_width(url, 20.0, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), url);
        for line in &lines {
            assert!(measure_mm(line, 10.0) <= 20.0);
        }
    }
}
