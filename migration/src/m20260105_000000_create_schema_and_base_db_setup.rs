use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS learning_assistant;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO learning_assistant, public;")
            .await?;

        // The application connects as `learning`; it owns everything in the schema
        manager
            .get_connection()
            .execute_unprepared(r#"
                DO $$ BEGIN
                    GRANT ALL PRIVILEGES ON DATABASE learning_assistant TO learning;
                    GRANT ALL ON SCHEMA learning_assistant TO learning;

                    ALTER DEFAULT PRIVILEGES IN SCHEMA learning_assistant GRANT ALL ON TABLES TO learning;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA learning_assistant GRANT ALL ON SEQUENCES TO learning;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA learning_assistant GRANT ALL ON FUNCTIONS TO learning;
                END $$;
            "#)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(r#"
                DO $$ BEGIN
                    ALTER DEFAULT PRIVILEGES IN SCHEMA learning_assistant REVOKE ALL ON FUNCTIONS FROM learning;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA learning_assistant REVOKE ALL ON SEQUENCES FROM learning;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA learning_assistant REVOKE ALL ON TABLES FROM learning;
                    REVOKE ALL ON SCHEMA learning_assistant FROM learning;
                    REVOKE ALL PRIVILEGES ON DATABASE learning_assistant FROM learning;
                END $$;
            "#)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS learning_assistant CASCADE;")
            .await?;

        Ok(())
    }
}
