/// Implement [`Record`](crate::Record) for an existing struct by listing the
/// fields that take part in row decoding, in declared order.
///
/// ```rust
/// use sqlite_rowmap::impl_record;
///
/// #[derive(Debug, Default)]
/// struct Player {
///     id: i64,
///     name: String,
///     cached_rank: u32,
/// }
///
/// impl_record!(Player { id, name });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn fields(&mut self) -> ::std::vec::Vec<$crate::Field<'_>> {
                ::std::vec![$($crate::Field::new(stringify!($field), &mut self.$field)),*]
            }
        }
    };
}

/// Declare a struct together with its [`Record`](crate::Record) impl.
///
/// Every field type must be a scalar slot (`i32`, `i64`, `f32`, `f64`,
/// `String`, or an `Option` of one of them).
///
/// ```rust
/// use sqlite_rowmap::record;
///
/// record! {
///     #[derive(Debug, Default, Clone, PartialEq)]
///     pub struct Track {
///         pub id: i64,
///         pub title: String,
///         pub rating: Option<f64>,
///     }
/// }
///
/// let track = Track::default();
/// assert_eq!(track.rating, None);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$fmeta:meta])* $fvis:vis $field:ident : $fty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($(#[$fmeta])* $fvis $field: $fty),*
        }

        $crate::impl_record!($name { $($field),* });
    };
}
