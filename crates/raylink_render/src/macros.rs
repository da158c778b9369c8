/// Declares a fieldless enum with an explicit integer representation and a
/// checked `from_raw` constructor for values arriving over the C boundary.
///
/// ```rust,ignore
/// raw_enum! {
///     pub enum FilterMode: u8 {
///         Nearest = 0,
///         Linear = 1,
///     }
/// }
/// assert_eq!(FilterMode::from_raw(1), Some(FilterMode::Linear));
/// assert_eq!(FilterMode::from_raw(7), None);
/// ```
#[macro_export]
macro_rules! raw_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr($repr)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $value),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            #[must_use]
            pub fn from_raw(raw: $repr) -> Option<Self> {
                match raw {
                    $(v if v == $value => Some($name::$variant),)*
                    _ => None,
                }
            }

            #[inline]
            #[must_use]
            pub fn raw(self) -> $repr {
                self as $repr
            }
        }
    };
}
