use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const ENUM_TYPES: &[(&str, &str)] = &[
    ("message_role", "'user', 'assistant'"),
    (
        "material_type",
        "'lecture', 'textbook', 'slides', 'assignment', 'other'",
    ),
    (
        "processing_status",
        "'pending', 'processing', 'processed', 'failed'",
    ),
    (
        "question_type",
        "'multiple_choice', 'true_false', 'short_answer'",
    ),
    ("difficulty", "'easy', 'medium', 'hard'"),
    ("quiz_status", "'generated', 'completed'"),
];

// Creation order; dropped in reverse.
const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
            CREATE TABLE IF NOT EXISTS learning_assistant.users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                google_id VARCHAR(255) NOT NULL UNIQUE,
                email VARCHAR(255) NOT NULL UNIQUE,
                name VARCHAR(255) NOT NULL,
                avatar TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
    ),
    (
        "conversations",
        r#"
            CREATE TABLE IF NOT EXISTS learning_assistant.conversations (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL REFERENCES learning_assistant.users(id) ON DELETE CASCADE,
                title VARCHAR(255) NOT NULL DEFAULT 'New Chat',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
    ),
    (
        "messages",
        r#"
            CREATE TABLE IF NOT EXISTS learning_assistant.messages (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                conversation_id UUID NOT NULL REFERENCES learning_assistant.conversations(id) ON DELETE CASCADE,
                role learning_assistant.message_role NOT NULL,
                content TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
    ),
    (
        "learning_materials",
        r#"
            CREATE TABLE IF NOT EXISTS learning_assistant.learning_materials (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL REFERENCES learning_assistant.users(id) ON DELETE CASCADE,
                conversation_id UUID REFERENCES learning_assistant.conversations(id) ON DELETE SET NULL,

                course_name VARCHAR(255) NOT NULL,
                material_type learning_assistant.material_type NOT NULL,
                description TEXT NOT NULL DEFAULT '',

                file_path TEXT NOT NULL,
                file_size BIGINT NOT NULL,
                original_filename VARCHAR(512) NOT NULL,

                processing_status learning_assistant.processing_status NOT NULL DEFAULT 'pending',
                processing_error TEXT,
                processed_at TIMESTAMPTZ,
                vector_document_count INTEGER,

                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
    ),
    (
        "questions",
        r#"
            CREATE TABLE IF NOT EXISTS learning_assistant.questions (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL REFERENCES learning_assistant.users(id) ON DELETE CASCADE,
                conversation_id UUID REFERENCES learning_assistant.conversations(id) ON DELETE SET NULL,
                material_id UUID NOT NULL REFERENCES learning_assistant.learning_materials(id) ON DELETE CASCADE,

                question TEXT NOT NULL,
                question_type learning_assistant.question_type NOT NULL,
                options JSONB NOT NULL DEFAULT '[]'::jsonb,
                correct_answer TEXT NOT NULL,
                explanation TEXT NOT NULL DEFAULT '',
                difficulty learning_assistant.difficulty NOT NULL DEFAULT 'medium',
                tags JSONB NOT NULL DEFAULT '[]'::jsonb,
                source_summary TEXT,

                attempts INTEGER NOT NULL DEFAULT 0,
                correct_attempts INTEGER NOT NULL DEFAULT 0,

                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
    ),
    (
        "practice_quizzes",
        r#"
            CREATE TABLE IF NOT EXISTS learning_assistant.practice_quizzes (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id UUID NOT NULL REFERENCES learning_assistant.users(id) ON DELETE CASCADE,
                conversation_id UUID NOT NULL REFERENCES learning_assistant.conversations(id) ON DELETE CASCADE,

                material_ids JSONB NOT NULL DEFAULT '[]'::jsonb,
                question_type learning_assistant.question_type NOT NULL DEFAULT 'multiple_choice',
                difficulty learning_assistant.difficulty NOT NULL DEFAULT 'medium',
                count INTEGER NOT NULL,
                status learning_assistant.quiz_status NOT NULL DEFAULT 'generated',
                material_summary TEXT NOT NULL DEFAULT '',

                -- Questions and graded submissions are embedded documents
                questions JSONB NOT NULL DEFAULT '[]'::jsonb,
                submissions JSONB NOT NULL DEFAULT '[]'::jsonb,

                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for (name, values) in ENUM_TYPES {
            db.execute_unprepared(&format!(
                "CREATE TYPE learning_assistant.{name} AS ENUM ({values})"
            ))
            .await?;

            db.execute_unprepared(&format!(
                "ALTER TYPE learning_assistant.{name} OWNER TO learning"
            ))
            .await?;
        }

        for (name, create_table_sql) in TABLES {
            db.execute_unprepared(create_table_sql).await?;

            db.execute_unprepared(&format!(
                "ALTER TABLE learning_assistant.{name} OWNER TO learning"
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for (name, _) in TABLES.iter().rev() {
            db.execute_unprepared(&format!(
                "DROP TABLE IF EXISTS learning_assistant.{name}"
            ))
            .await?;
        }

        for (name, _) in ENUM_TYPES.iter().rev() {
            db.execute_unprepared(&format!("DROP TYPE IF EXISTS learning_assistant.{name}"))
                .await?;
        }

        Ok(())
    }
}
