//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::{error::Categorized, infra::database, Category};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// GraphQL API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Creates a new [`Error`] out of the provided [`Categorized`] one.
    ///
    /// [`None`] is returned for [`Category::Persistence`] failures, so they
    /// end up reported as internal server errors.
    #[must_use]
    pub fn categorized<E>(err: &E) -> Option<Self>
    where
        E: Categorized + fmt::Display + ?Sized,
    {
        use http::StatusCode as S;

        let (code, status_code) = match err.category() {
            Category::Validation => ("VALIDATION_ERROR", S::BAD_REQUEST),
            Category::NotFound => ("NOT_FOUND", S::NOT_FOUND),
            Category::BusinessRule => {
                ("BUSINESS_RULE_VIOLATION", S::BAD_REQUEST)
            }
            Category::StateConflict => ("STATE_CONFLICT", S::CONFLICT),
            Category::DuplicateOffer => ("DUPLICATE_OFFER", S::BAD_REQUEST),
            Category::DuplicateFavorite => {
                ("DUPLICATE_FAVORITE", S::BAD_REQUEST)
            }
            Category::Persistence => return None,
        };
        Some(Self {
            code,
            status_code,
            backtrace: None,
            message: err.to_string(),
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let mut ext = juniper::Object::with_capacity(1);
        drop(
            ext.add_field("code", juniper::Value::scalar(self.code.to_owned())),
        );
        drop(
            ext.add_field(
                "backtrace",
                juniper::Value::list(
                    self.backtrace
                        .iter()
                        .flat_map(|trace| trace.iter())
                        .map(|frame| juniper::Value::scalar(frame.to_string()))
                        .collect(),
                ),
            ),
        );
        juniper::FieldError::new(self.message, juniper::Value::object(ext))
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

/// Implements [`AsError`] for the provided [`Categorized`] errors.
#[macro_export]
macro_rules! impl_categorized_as_error {
    ($($err:ty),* $(,)?) => {
        $(
            impl $crate::AsError for $err {
                fn try_as_error(&self) -> Option<$crate::Error> {
                    $crate::Error::categorized(self)
                }
            }
        )*
    };
}

#[cfg(test)]
mod spec {
    use service::{
        command::create_car_offer,
        domain::validation,
        infra::database::{self, memory},
    };

    use super::{AsError as _, Error};

    #[test]
    fn maps_categories_to_codes() {
        let err = create_car_offer::ExecutionError::AlreadyOffered;
        let err = err.as_error();
        assert_eq!(err.code, "DUPLICATE_OFFER");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message,
            "Dealership already has an offer for this car",
        );

        let err = create_car_offer::ExecutionError::Invalid(
            validation::Error::Blank("Notes"),
        );
        let err = err.as_error();
        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(err.message, "Notes must not be blank");
    }

    #[test]
    fn persistence_failures_are_internal() {
        let err = create_car_offer::ExecutionError::Db(
            database::Error::Memory(memory::Error::Finished),
        );

        assert!(Error::categorized(&err).is_none());
        assert_eq!(
            err.as_error().status_code,
            http::StatusCode::INTERNAL_SERVER_ERROR,
        );
    }
}
