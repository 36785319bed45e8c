//! Terminal coloring
//!
//! Coloring uses the [Colored crate](https://docs.rs/colored/latest/colored/) behind the
//! `color` Cargo feature.
//! When the feature is disabled every method of [Colorize] returns the input unchanged,
//! so downstream code can call the methods unconditionally:
//!
//! ```
//! use jtex::color::Colorize;
//! println!["{}", "Hello, World".bold().bright_red()];
//! ```

macro_rules! colorize_impl {
    ( $( $method_name: ident, )+ ) => {
        /// Trait that provides coloring methods on strings.
        ///
        /// See the module documentation for information.
        pub trait Colorize {
            $(
                fn $method_name(&self) -> String;
            )+
        }
        impl Colorize for str {
            $(
                #[cfg(feature = "color")]
                fn $method_name(&self) -> String {
                    colored::Colorize::$method_name(self).to_string()
                }
                #[cfg(not(feature = "color"))]
                fn $method_name(&self) -> String {
                    self.to_string()
                }
            )+
        }
    };
}

colorize_impl!(
    bold,
    bright_cyan,
    bright_red,
    bright_yellow,
    yellow,
);
