/// A macro version of [Option::unwrap_or_else] which supports flow control
/// statements such as `return` and `continue` in the "else" branch.
///
/// ```ignore
/// let at = crate::utils::unwrap_or!(find_ci(line, " of ", 0); continue);
/// ```
///
/// Only use it for short jumps, it hides control flow without an `if`.
macro_rules! unwrap_or {
  ($m:expr; $fail:expr) => {{
    if let Some(res) = ($m) { res } else { $fail }
  }};
}

pub(crate) use unwrap_or;
