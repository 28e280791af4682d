//! Small shared helpers with no home of their own.

/// Unsafe array access macro that skips bounds checking.
///
/// Used on the hot path (move tables, Zobrist table) where the index is
/// always derived from a board square or byte and is known in-bounds.
#[macro_export]
macro_rules! uget {
    ($arr:expr; $i:expr $(,)?) => {{
        #[allow(unused_unsafe)]
        #[allow(clippy::macro_metavars_in_unsafe)]
        unsafe {{ ($arr).get_unchecked($i) }}
    }};
    ($arr:expr; $i:expr, $($rest:expr),+ $(,)?) => {{
        let __p = {{
            #[allow(unused_unsafe)]
            #[allow(clippy::macro_metavars_in_unsafe)]
            unsafe {{ ($arr).get_unchecked($i) }}
        }};
        $crate::uget!(&*__p; $($rest),+)
    }};
}
