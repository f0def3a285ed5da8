/// A closed set of fieldless variants that can be listed up front.
///
/// Derive it with `#[derive(CaseIterable)]`; the cases come out in
/// declaration order.
pub trait CaseIterable: Sized + 'static {
    const ALL_CASES: &'static [Self];
}

/// Which phase of an assignment an observer wants to hear about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, perch_core_macros::CaseIterable)]
pub enum EventKind {
    /// Fired before the stored value is replaced, with `(incoming, current)`.
    WillChange,
    /// Fired after the stored value is replaced, with `(current, replaced)`.
    DidChange,
}
