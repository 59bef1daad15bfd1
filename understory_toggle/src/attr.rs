// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute names of the declarative markup.
//!
//! The default [`Accessors`](crate::Accessors) read these; embedders with a
//! different markup scheme replace the accessors instead of the names.

/// Marks a trigger. The value is the target expression.
pub const TOGGLE: &str = "data-toggle";

/// Space-delimited group names.
pub const GROUP: &str = "data-toggle-group";

/// Space-delimited notification event names.
pub const EVENT: &str = "data-toggle-event";

/// Space-delimited toggle classes, overriding the configured defaults.
pub const CLASS: &str = "data-toggle-class";

/// Trigger method name, overriding the configured default.
pub const METHOD: &str = "data-toggle-method";

/// Presence only: leave the native default action alone.
pub const BUBBLE: &str = "data-toggle-bubble";

/// Presence only: a container whose inner interactions are not "outside" it.
///
/// Read by [`policy::target_container`](crate::policy::target_container).
pub const TARGET: &str = "data-toggle-target";

/// Presence only: an active grouped trigger stays active when fired again.
///
/// Read by [`policy::group_keep`](crate::policy::group_keep).
pub const GROUP_KEEP: &str = "data-toggle-group-keep";
