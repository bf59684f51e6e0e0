// The form as plain data: field values, repeated entry groups, status line.
// The controller reads and writes it; nothing here knows about HTTP.

pub mod state;
pub mod template;

pub use state::{FieldId, FormState, GroupKind};
pub use template::{EntryGroup, GroupEntry, GroupTemplate};
