//! Token counting traits and utilities

pub mod tiktoken;

/// Trait for counting tokens in a string.
pub trait CountToken {
    fn count_token(&self, string: &str) -> usize;
}

/// Blanket impl of CountToken for Fn(&str) -> usize.
impl<F> CountToken for F where F: Fn(&str) -> usize {
    fn count_token(&self, string: &str) -> usize {
        self(string)
    }
}

/// Count the number of tokens in a string by the length of the string.
#[inline]
pub fn count_tokens_by_len(string: &str) -> usize {
    string.len()
}

/// Rough count assuming about four bytes per token, which is close enough for English prose.
#[inline]
pub fn estimate_tokens(string: &str) -> usize {
    string.len().div_ceil(4)
}

#[cfg(test)]
mod test_token {
    use super::{estimate_tokens, CountToken};

    #[test]
    fn test_str_len_impl() {
        let counter = str::len;
        let size = counter.count_token("");
        assert_eq!(0, size);
    }

    #[test]
    fn test_estimate() {
        assert_eq!(0, estimate_tokens(""));
        assert_eq!(1, estimate_tokens("abc"));
        assert_eq!(2, estimate_tokens("abcde"));
    }
}
