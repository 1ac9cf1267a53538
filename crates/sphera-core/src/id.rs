use slotmap::new_key_type;

new_key_type! {
    /// Identifies a live anchor in the anchor store.
    ///
    /// Keys are generational: once an anchor is collected or cleared, its
    /// key never resolves again, so stale handles held by the UI are
    /// harmless.
    pub struct AnchorId;
}
