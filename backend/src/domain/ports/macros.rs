//! Helper macros for generating domain port error enums.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        $crate::domain::ports::define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        $crate::domain::ports::define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                $crate::domain::ports::define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

/// Repository errors share two failure modes: the store is unreachable, or a
/// statement failed. Unreachable stores surface as `ServiceUnavailable`;
/// failed statements as redacted internal errors.
macro_rules! define_repository_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            connection => $connection:literal,
            query => $query:literal $(,)?
        }
    ) => {
        $crate::domain::ports::define_port_error! {
            $(#[$outer])*
            pub enum $name {
                /// Repository connection could not be established.
                Connection { message: String } => $connection,
                /// Query or mutation failed during execution.
                Query { message: String } => $query,
            }
        }

        impl From<$name> for $crate::domain::Error {
            fn from(error: $name) -> Self {
                match error {
                    $name::Connection { message } => Self::service_unavailable(message),
                    $name::Query { message } => Self::internal(message),
                }
            }
        }
    };
}

pub(crate) use define_port_error;
pub(crate) use define_repository_error;
