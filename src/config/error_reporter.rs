//! Readable KDL parse errors.
//!
//! Turns a `KdlError` into a rustc-style report:
//!
//! ```text
//! error: Expected a node terminator
//!   --> /etc/aurwatch/aurwatch.kdl:4:12
//!    |
//!  4 |     interval 86400 }
//!    |            ^
//! ```

use kdl::KdlError;
use std::fmt::Write;

pub fn format_error_report(content: &str, file_path: Option<&str>, error: &KdlError) -> String {
    let mut report = String::new();

    if error.diagnostics.is_empty() {
        let _ = writeln!(&mut report, "error: Failed to parse KDL document");
        return report;
    }

    for (i, diag) in error.diagnostics.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(&mut report);
        }

        let (line_num, col_num) = offset_to_line_col(content, diag.span.offset());
        let message = diag
            .message
            .clone()
            .unwrap_or_else(|| "Parse error".to_string());

        let _ = writeln!(&mut report, "error: {}", message);
        if let Some(path) = file_path {
            let _ = writeln!(&mut report, "  --> {}:{}:{}", path, line_num, col_num);
        }
        report.push_str(&source_line(content, line_num, col_num));
        if let Some(help) = &diag.help {
            let _ = writeln!(&mut report, "  = help: {}", help);
        }
    }

    report
}

fn offset_to_line_col(content: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;

    for (i, c) in content.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

fn source_line(content: &str, line_num: usize, col_num: usize) -> String {
    let mut output = String::new();
    let Some(line) = content.lines().nth(line_num.saturating_sub(1)) else {
        return output;
    };
    let width = line_num.to_string().len();

    let _ = writeln!(&mut output, " {:width$} |", "", width = width);
    let _ = writeln!(&mut output, " {:>width$} | {}", line_num, line, width = width);
    let _ = writeln!(
        &mut output,
        " {:width$} | {}^",
        "",
        " ".repeat(col_num.saturating_sub(1)),
        width = width
    );
    output
}
