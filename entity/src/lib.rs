use uuid::Uuid;

pub mod conversations;
pub mod learning_materials;
pub mod messages;
pub mod practice_quizzes;
pub mod questions;
pub mod users;

pub mod difficulty;
pub mod json_list;
pub mod material_type;
pub mod message_role;
pub mod processing_status;
pub mod question_type;
pub mod quiz_status;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
