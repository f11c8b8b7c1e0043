use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// An element that can appear in a chromosome sequence.
///
/// Implementors are small, copyable values. `value` feeds the default
/// fitness function (mean symbol value over the genome), `default_alphabet`
/// and `filler` build the default chromosome.
pub trait Symbol:
    Copy + PartialEq + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Numeric contribution of this symbol to the default fitness.
    fn value(&self) -> f64;

    /// Alphabet used when none is supplied.
    fn default_alphabet() -> Vec<Self>;

    /// Symbol used to fill default chromosomes.
    fn filler() -> Self;
}

macro_rules! impl_integer_symbol {
    ($($t:ty),*) => {
        $(
            impl Symbol for $t {
                #[inline(always)]
                fn value(&self) -> f64 {
                    *self as f64
                }

                fn default_alphabet() -> Vec<Self> {
                    vec![1, 0]
                }

                #[inline(always)]
                fn filler() -> Self {
                    0
                }
            }
        )*
    };
}

impl_integer_symbol!(u8, u16, u32, i32, i64);

impl Symbol for bool {
    #[inline(always)]
    fn value(&self) -> f64 {
        if *self {
            1.0
        } else {
            0.0
        }
    }

    fn default_alphabet() -> Vec<Self> {
        vec![true, false]
    }

    fn filler() -> Self {
        false
    }
}

/// Decimal digits count as their digit value, everything else as zero.
impl Symbol for char {
    fn value(&self) -> f64 {
        self.to_digit(10).map_or(0.0, f64::from)
    }

    fn default_alphabet() -> Vec<Self> {
        vec!['1', '0']
    }

    fn filler() -> Self {
        '0'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_symbols() {
        assert_eq!(5u8.value(), 5.0);
        assert_eq!((-3i32).value(), -3.0);
        assert_eq!(u16::default_alphabet(), vec![1, 0]);
        assert_eq!(i64::filler(), 0);
    }

    #[test]
    fn test_bool_symbol() {
        assert_eq!(true.value(), 1.0);
        assert_eq!(false.value(), 0.0);
        assert_eq!(bool::default_alphabet(), vec![true, false]);
    }

    #[test]
    fn test_char_symbol() {
        assert_eq!('7'.value(), 7.0);
        assert_eq!('x'.value(), 0.0);
        assert_eq!(char::filler(), '0');
    }
}
