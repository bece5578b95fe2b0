/// Clean up bracketed-paste text before it reaches the editor.
///
/// Carriage returns are dropped, and every line after the first loses one
/// leading tab: terminals that auto-indent pasted lines otherwise double the
/// indentation.
pub fn normalize_paste(text: &str) -> String {
    let text = text.replace('\r', "");
    let mut out = String::with_capacity(text.len());
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
            out.push_str(line.strip_prefix('\t').unwrap_or(line));
        } else {
            out.push_str(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_tab_after_first_line() {
        assert_eq!(normalize_paste("a\n\tb\n\tc"), "a\nb\nc");
    }

    #[test]
    fn keeps_first_line_and_extra_tabs() {
        assert_eq!(
            normalize_paste("\tfn x() {\n\t\tbody\n\t}"),
            "\tfn x() {\n\tbody\n}"
        );
    }

    #[test]
    fn removes_carriage_returns() {
        assert_eq!(normalize_paste("one\r\n\ttwo\r\n"), "one\ntwo\n");
    }

    #[test]
    fn single_line_is_untouched() {
        assert_eq!(normalize_paste("plain"), "plain");
        assert_eq!(normalize_paste(""), "");
    }
}
