#![allow(unused_imports, unused_macros)]

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        pub(crate) use defmt::{trace, debug, info, warn, error};
    }
    else if #[cfg(feature = "log")] {
        pub(crate) use log::{trace, debug, info, warn, error};
    }
    else {
        macro_rules! trace {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! debug {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! info {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! warn {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! error {
            ($($arg:tt)*) => {{}};
        }
        pub(crate) use {trace, debug, info, warn, error};
    }
}
