//! Property-based suites (proptest).

mod flatten_props;
