//! Tolerant preprocessing for the editor's settings file.
//!
//! Editor settings are JSON-with-comments and routinely carry trailing
//! commas. Strip both down to plain JSON before handing the text to
//! serde; string literals (including escapes) must pass through
//! untouched.

/// Remove `//` and `/* */` comments and trailing commas.
pub(crate) fn strip(content: &str) -> String {
    fix_trailing_commas(&strip_comments(content))
}

fn strip_comments(content: &str) -> String {
    let mut cleaned = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                in_string = !in_string;
                cleaned.push(ch);
            }
            '\\' if in_string => {
                cleaned.push(ch);
                if let Some(escaped) = chars.next() {
                    cleaned.push(escaped);
                }
            }
            '/' if !in_string => match chars.peek() {
                Some('/') => {
                    // Line comment: keep the newline for line counting.
                    for next in chars.by_ref() {
                        if next == '\n' {
                            cleaned.push(next);
                            break;
                        }
                    }
                }
                Some('*') => {
                    chars.next();
                    let mut prev = '\0';
                    for next in chars.by_ref() {
                        if prev == '*' && next == '/' {
                            break;
                        }
                        prev = next;
                    }
                }
                _ => cleaned.push(ch),
            },
            _ => cleaned.push(ch),
        }
    }

    cleaned
}

fn fix_trailing_commas(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                in_string = !in_string;
                result.push(ch);
            }
            '\\' if in_string => {
                result.push(ch);
                if let Some(escaped) = chars.next() {
                    result.push(escaped);
                }
            }
            ',' if !in_string => {
                let mut whitespace = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() {
                        whitespace.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match chars.peek() {
                    // Trailing comma: drop it, keep the whitespace.
                    Some('}' | ']') => result.push_str(&whitespace),
                    _ => {
                        result.push(ch);
                        result.push_str(&whitespace);
                    }
                }
            }
            _ => result.push(ch),
        }
    }

    result
}
