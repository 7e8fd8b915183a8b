//! Field rules shared by the constructors of all the domain values.
//!
//! Every rule reports the offending field by its human-readable name, so the
//! resulting [`Error`] is directly presentable to the caller.

use std::{fmt, str::FromStr};

use common::{DateTimeOf, Money};
use derive_more::{Display, Error as StdError};
use regex::Regex;
use rust_decimal::Decimal;
use strum::VariantNames;

/// Human-readable name of a validated field.
pub type Field = &'static str;

/// Unix timestamp of `2000-01-01T00:00:00Z`, the earliest accepted date of
/// marketplace events.
pub const EPOCH_2000: i64 = 946_684_800;

/// Violation of a field rule.
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Text field is empty or consists of whitespace only.
    #[display("{_0} must not be blank")]
    Blank(#[error(not(source))] Field),

    /// Text field exceeds its length ceiling.
    #[display("{field} must be at most {max} characters long")]
    TooLong {
        /// Name of the field.
        field: Field,

        /// Maximum number of characters.
        max: usize,
    },

    /// Amount is zero or negative.
    #[display("{_0} must be greater than zero")]
    NotPositive(#[error(not(source))] Field),

    /// Amount exceeds its ceiling.
    #[display("{field} must not exceed {max}")]
    TooLarge {
        /// Name of the field.
        field: Field,

        /// Maximum amount.
        max: Decimal,
    },

    /// Amount has too many fractional digits.
    #[display("{field} must have at most {max} decimal places")]
    TooPrecise {
        /// Name of the field.
        field: Field,

        /// Maximum number of fractional digits.
        max: u32,
    },

    /// Number lies outside of its inclusive bounds.
    #[display("{field} must be between {min} and {max}")]
    OutOfRange {
        /// Name of the field.
        field: Field,

        /// Lower bound.
        min: i64,

        /// Upper bound.
        max: i64,
    },

    /// Date is not strictly in the past.
    #[display("{_0} must be in the past")]
    NotInPast(#[error(not(source))] Field),

    /// Date lies too far in the future.
    #[display("{_0} must not be in the future")]
    InFuture(#[error(not(source))] Field),

    /// Date is not after its lower bound.
    #[display("{field} must be after {after}")]
    TooEarly {
        /// Name of the field.
        field: Field,

        /// Human-readable lower bound.
        after: &'static str,
    },

    /// Text doesn't match the required format.
    #[display("{field} must be {expected}")]
    Format {
        /// Name of the field.
        field: Field,

        /// Description of the expected format.
        expected: &'static str,
    },

    /// Text names no variant of an enumeration.
    #[display(
        "Invalid {field} `{value}`, expected one of: {}",
        allowed.join(", "),
    )]
    UnknownVariant {
        /// Name of the field.
        field: Field,

        /// Rejected value.
        value: String,

        /// Names of all the allowed variants.
        allowed: &'static [&'static str],
    },
}

/// Checks that the `value` is not blank and fits into `max` characters,
/// returning it trimmed.
///
/// # Errors
///
/// [`Error::Blank`] or [`Error::TooLong`].
pub fn text(
    field: Field,
    value: impl Into<String>,
    max: usize,
) -> Result<String, Error> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Blank(field));
    }
    max_len(field, trimmed, max)?;
    Ok(if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_owned()
    })
}

/// Normalizes an optional text: a blank `value` becomes [`None`], otherwise
/// it's trimmed and must fit into `max` characters.
///
/// # Errors
///
/// [`Error::TooLong`].
pub fn optional_text(
    field: Field,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, Error> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .map(|v| max_len(field, &v, max).map(|()| v))
        .transpose()
}

/// Checks that the `value` fits into `max` characters.
///
/// # Errors
///
/// [`Error::TooLong`].
pub fn max_len(field: Field, value: &str, max: usize) -> Result<(), Error> {
    if value.chars().count() > max {
        return Err(Error::TooLong { field, max });
    }
    Ok(())
}

/// Checks that the `amount` lies in `(0, max]` and has no more than `scale`
/// fractional digits. The amount is compared exactly, without rounding.
///
/// # Errors
///
/// [`Error::NotPositive`], [`Error::TooLarge`] or [`Error::TooPrecise`].
pub fn amount(
    field: Field,
    amount: Money,
    max: Decimal,
    scale: u32,
) -> Result<Money, Error> {
    if amount.amount() <= Decimal::ZERO {
        return Err(Error::NotPositive(field));
    }
    if amount.amount() > max {
        return Err(Error::TooLarge { field, max });
    }
    if amount.fraction_digits() > scale {
        return Err(Error::TooPrecise { field, max: scale });
    }
    Ok(amount)
}

/// Checks that the `value` lies in `[min, max]`.
///
/// # Errors
///
/// [`Error::OutOfRange`].
pub fn range<T>(field: Field, value: T, min: T, max: T) -> Result<T, Error>
where
    T: Copy + Into<i64> + PartialOrd,
{
    if value < min || value > max {
        return Err(Error::OutOfRange {
            field,
            min: min.into(),
            max: max.into(),
        });
    }
    Ok(value)
}

/// Checks that the `value` fully matches the `format`.
///
/// # Errors
///
/// [`Error::Format`].
pub fn format(
    field: Field,
    value: impl Into<String>,
    format: &Regex,
    expected: &'static str,
) -> Result<String, Error> {
    let value = value.into();
    if !format.is_match(&value) {
        return Err(Error::Format { field, expected });
    }
    Ok(value)
}

/// Checks that the `url` uses the `http` or `https` scheme.
///
/// # Errors
///
/// [`Error::Format`].
pub fn url(field: Field, url: impl Into<String>) -> Result<String, Error> {
    let url = url.into();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.trim().is_empty() => Ok(url),
        Some(_) | None => Err(Error::Format {
            field,
            expected: "a valid http:// or https:// URL",
        }),
    }
}

/// Checks that the `date` is after `2000-01-01`.
///
/// # Errors
///
/// [`Error::TooEarly`].
pub fn after_2000<Of: ?Sized>(
    field: Field,
    date: DateTimeOf<Of>,
) -> Result<DateTimeOf<Of>, Error> {
    let epoch = i128::from(EPOCH_2000) * 1_000_000_000;
    if date.unix_timestamp_nanos() <= epoch {
        return Err(Error::TooEarly {
            field,
            after: "2000-01-01",
        });
    }
    Ok(date)
}

/// Checks that the `date` lies strictly before `now`.
///
/// # Errors
///
/// [`Error::NotInPast`].
pub fn in_past<Of: ?Sized>(
    field: Field,
    date: DateTimeOf<Of>,
    now: DateTimeOf<Of>,
) -> Result<DateTimeOf<Of>, Error> {
    if date >= now {
        return Err(Error::NotInPast(field));
    }
    Ok(date)
}

/// Checks that the `date` doesn't lie after the `latest` allowed moment.
///
/// # Errors
///
/// [`Error::InFuture`].
pub fn not_after<Of: ?Sized>(
    field: Field,
    date: DateTimeOf<Of>,
    latest: DateTimeOf<Of>,
) -> Result<DateTimeOf<Of>, Error> {
    if date > latest {
        return Err(Error::InFuture(field));
    }
    Ok(date)
}

/// Parses the `value` into a variant of the `K`ind enumeration.
///
/// # Errors
///
/// [`Error::UnknownVariant`] carrying the rejected `value` and all the
/// allowed variants.
pub fn parse_kind<K>(field: Field, value: &str) -> Result<K, Error>
where
    K: FromStr + VariantNames,
    K::Err: fmt::Debug,
{
    K::from_str(value.trim()).map_err(|_| Error::UnknownVariant {
        field,
        value: value.to_owned(),
        allowed: K::VARIANTS,
    })
}

#[cfg(test)]
mod spec {
    use std::{str::FromStr as _, sync::LazyLock, time::Duration};

    use common::{define_kind, DateTime, Money};
    use regex::Regex;
    use rust_decimal::Decimal;

    use super::Error;

    define_kind! {
        #[doc = "Test kind."]
        enum Shape {
            #[doc = "Cube."]
            Cube = 1,

            #[doc = "Square pyramid."]
            SquarePyramid = 2,
        }
    }

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn text_is_trimmed_and_bounded() {
        assert_eq!(super::text("Brand", " Ford ", 100).unwrap(), "Ford");
        assert_eq!(super::text("Brand", "Ford", 4).unwrap(), "Ford");

        assert_eq!(
            super::text("Brand", "   ", 100),
            Err(Error::Blank("Brand")),
        );
        assert_eq!(
            super::text("Brand", "Fiat", 3),
            Err(Error::TooLong {
                field: "Brand",
                max: 3,
            }),
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(super::max_len("Comment", "ñandú", 5).is_ok());
        assert!(super::max_len("Comment", "ñandúes", 5).is_err());
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(super::optional_text("Comment", None, 10), Ok(None));
        assert_eq!(
            super::optional_text("Comment", Some("  ".into()), 10),
            Ok(None),
        );
        assert_eq!(
            super::optional_text("Comment", Some("Nice".into()), 10),
            Ok(Some("Nice".into())),
        );
        assert_eq!(
            super::optional_text("Comment", Some("  nice  ".into()), 10),
            Ok(Some("nice".into())),
        );
        assert!(super::optional_text("Comment", Some("x".repeat(11)), 10)
            .is_err());
        assert!(super::optional_text(
            "Comment",
            Some(format!("  {}  ", "x".repeat(10))),
            10,
        )
        .is_ok());
    }

    #[test]
    fn amount_bounds_and_scale() {
        let max = Decimal::new(9_999_999_999, 2);

        assert!(super::amount("Price", money("25000.00"), max, 2).is_ok());
        assert!(super::amount("Price", money("99999999.99"), max, 2).is_ok());
        assert!(super::amount("Price", money("0.01"), max, 2).is_ok());

        assert_eq!(
            super::amount("Price", money("0"), max, 2),
            Err(Error::NotPositive("Price")),
        );
        assert_eq!(
            super::amount("Price", money("-1"), max, 2),
            Err(Error::NotPositive("Price")),
        );
        assert!(matches!(
            super::amount("Price", money("100000000.00"), max, 2),
            Err(Error::TooLarge { .. }),
        ));
        assert_eq!(
            super::amount("Price", money("1.001"), max, 2),
            Err(Error::TooPrecise {
                field: "Price",
                max: 2,
            }),
        );
        assert!(super::amount("Price", money("1.100"), max, 2).is_err());
    }

    #[test]
    fn range_is_inclusive() {
        assert_eq!(super::range("Rating", 0_u8, 0, 10), Ok(0));
        assert_eq!(super::range("Rating", 10_u8, 0, 10), Ok(10));

        let err = super::range("Rating", 11_u8, 0, 10).unwrap_err();
        assert_eq!(err.to_string(), "Rating must be between 0 and 10");
    }

    #[test]
    fn format_requires_full_match() {
        static DIGITS: LazyLock<Regex> =
            LazyLock::new(|| Regex::new("^[0-9]{7,8}$").unwrap());

        assert!(super::format("DNI", "1234567", &DIGITS, "7-8 digits").is_ok());
        assert!(super::format("DNI", "123456", &DIGITS, "7-8 digits").is_err());
        assert!(super::format("DNI", "12a45678", &DIGITS, "7-8 digits")
            .is_err());
    }

    #[test]
    fn url_scheme() {
        assert!(
            super::url("Image URL", "https://cdn.example.com/a.png").is_ok()
        );
        assert!(super::url("Image URL", "http://example.com").is_ok());

        assert!(super::url("Image URL", "ftp://example.com").is_err());
        assert!(super::url("Image URL", "example.com").is_err());
        assert!(super::url("Image URL", "https://").is_err());
    }

    #[test]
    fn dates() {
        let now = DateTime::now();
        let hour = Duration::from_secs(60 * 60);

        assert!(super::in_past("Purchase date", now - hour, now).is_ok());
        assert_eq!(
            super::in_past("Purchase date", now, now),
            Err(Error::NotInPast("Purchase date")),
        );

        assert!(super::not_after("Offer date", now, now).is_ok());
        assert!(super::not_after("Offer date", now + hour, now).is_err());

        let y2k = DateTime::from_rfc3339("2000-01-01T00:00:00Z").unwrap();
        assert_eq!(
            super::after_2000("Date added", y2k).unwrap_err().to_string(),
            "Date added must be after 2000-01-01",
        );
        assert!(super::after_2000("Date added", y2k + hour).is_ok());

        let half_second_later =
            DateTime::from_rfc3339("2000-01-01T00:00:00.500Z").unwrap();
        assert!(super::after_2000("Date added", half_second_later).is_ok());
    }

    #[test]
    fn parses_kind() {
        assert_eq!(
            super::parse_kind::<Shape>("Shape", "SQUARE_PYRAMID"),
            Ok(Shape::SquarePyramid),
        );
        assert_eq!(
            super::parse_kind::<Shape>("Shape", " CUBE "),
            Ok(Shape::Cube),
        );

        let err = super::parse_kind::<Shape>("Shape", "SPHERE").unwrap_err();
        assert_eq!(
            err,
            Error::UnknownVariant {
                field: "Shape",
                value: "SPHERE".into(),
                allowed: &["CUBE", "SQUARE_PYRAMID"],
            },
        );
        assert_eq!(
            err.to_string(),
            "Invalid Shape `SPHERE`, expected one of: CUBE, SQUARE_PYRAMID",
        );
    }
}
