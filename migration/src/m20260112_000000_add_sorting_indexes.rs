use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (index name, table, columns) backing the list endpoints' filters and sort orders.
const INDEXES: &[(&str, &str, &[&str])] = &[
    (
        "conversations_user_id_updated_at",
        "conversations",
        &["user_id", "updated_at"],
    ),
    (
        "messages_conversation_id_created_at",
        "messages",
        &["conversation_id", "created_at"],
    ),
    (
        "learning_materials_user_id_created_at",
        "learning_materials",
        &["user_id", "created_at"],
    ),
    (
        "learning_materials_conversation_id",
        "learning_materials",
        &["conversation_id"],
    ),
    (
        "questions_user_id_created_at",
        "questions",
        &["user_id", "created_at"],
    ),
    ("questions_material_id", "questions", &["material_id"]),
    (
        "practice_quizzes_user_id_created_at",
        "practice_quizzes",
        &["user_id", "created_at"],
    ),
    (
        "practice_quizzes_conversation_id",
        "practice_quizzes",
        &["conversation_id"],
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, columns) in INDEXES {
            let mut index = Index::create();
            index
                .name(*name)
                .table((Alias::new("learning_assistant"), Alias::new(*table)));
            for column in columns.iter() {
                index.col(Alias::new(*column));
            }

            manager.create_index(index.to_owned()).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _) in INDEXES.iter().rev() {
            manager
                .drop_index(
                    Index::drop()
                        .name(*name)
                        .table((Alias::new("learning_assistant"), Alias::new(*table)))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}
