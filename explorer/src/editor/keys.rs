//! Key sequences for `--remote-send`

use std::path::Path;

/// Characters Vim's `fnameescape()` protects with a backslash on Unix
const PATH_ESC_CHARS: &str = " \t\n*?[{`$\\%#'\"|!<";

/// Escape a file name for use after an Ex command, like Vim's `fnameescape()`.
pub fn fnameescape(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);

    // A leading '+' or '>' starts an argument, a lone '-' means "previous dir"
    if name.starts_with('+') || name.starts_with('>') || name == "-" {
        out.push('\\');
    }

    for ch in name.chars() {
        if PATH_ESC_CHARS.contains(ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Keys that leave whatever mode the editor is in and `:edit` the path.
///
/// `<` starts key notation in `--remote-send`, so it is sent as `<lt>`.
pub fn edit_keys(path: &Path) -> String {
    let escaped = fnameescape(&path.to_string_lossy()).replace('<', "<lt>");
    format!("<C-\\><C-N>:edit {}<CR>", escaped)
}
