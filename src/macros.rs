// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression — works for literals, consts, or vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! join {
    // String-type concatenation shorthand!
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str($rest);
        )+
        s
    }};
}

/// Compile a CSS selector that is known-good at authoring time.
/// Selectors are string literals in this crate; a bad one is a programming error.
#[macro_export]
macro_rules! sel {
    ($css:expr) => {
        ::scraper::Selector::parse($css).unwrap_or_else(|e| panic!("bad selector {:?}: {e}", $css))
    };
}
