//! Small value normalisers shared by the provider payload mappers.

use beanverdict_core::round_one_decimal;

/// Round a provider rating to one decimal place.
pub(crate) fn round_rating(rating: Option<f64>) -> Option<f64> {
    rating.filter(|r| r.is_finite()).map(round_one_decimal)
}

/// Render a numeric price tier as `"$"` through `"$$$$"`.
pub(crate) fn price_symbols(level: Option<i64>) -> Option<String> {
    level.map(|l| "$".repeat(usize::try_from(l.clamp(1, 4)).unwrap_or(1)))
}

/// Join the non-blank parts with `", "`, returning `None` when nothing remains.
pub(crate) fn join_address<'a, I>(parts: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let joined = parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    (!joined.is_empty()).then_some(joined)
}

/// Treat blank strings as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_symbols_clamp_to_one_through_four() {
        assert_eq!(price_symbols(Some(0)).as_deref(), Some("$"));
        assert_eq!(price_symbols(Some(2)).as_deref(), Some("$$"));
        assert_eq!(price_symbols(Some(9)).as_deref(), Some("$$$$"));
        assert_eq!(price_symbols(None), None);
    }

    #[test]
    fn join_address_skips_blank_parts() {
        assert_eq!(
            join_address([Some("1200"), None, Some(" "), Some("Austin")]).as_deref(),
            Some("1200, Austin")
        );
        assert_eq!(join_address([None, Some("")]), None);
    }

    #[test]
    fn round_rating_drops_nan() {
        assert_eq!(round_rating(Some(4.36)), Some(4.4));
        assert_eq!(round_rating(Some(f64::NAN)), None);
    }
}
