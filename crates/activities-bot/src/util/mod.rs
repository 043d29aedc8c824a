use crate::prelude::*;

/// Wrapper that hides its contents from [`Debug`](fmt::Debug) output
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DebugShim<T>(pub T);

impl<T> fmt::Debug for DebugShim<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T> From<T> for DebugShim<T> {
    fn from(val: T) -> Self { Self(val) }
}

#[cfg(test)]
mod tests {
    use super::DebugShim;

    #[test]
    fn hides_contents() {
        let shim = DebugShim::from(String::from("hunter2"));
        let dbg = format!("{shim:?}");

        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("String"));
    }
}
