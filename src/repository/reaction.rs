//! Reaction repository.
//!
//! Reactions are the one place with replace semantics: counts change over
//! time and every re-crawl must refresh them, so (post, type) upserts.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::pool::{AsyncSqlitePool, DieselError};
use super::records::{NewReaction, ReactionRecord};
use crate::models::Reaction;
use crate::schema::reactions;

impl From<ReactionRecord> for Reaction {
    fn from(record: ReactionRecord) -> Self {
        Reaction {
            post_id: record.post_id,
            reaction_type: record.reaction_type,
            count: record.count,
        }
    }
}

/// Reaction repository with compile-time query checking.
#[derive(Clone)]
pub struct ReactionRepository {
    pool: AsyncSqlitePool,
}

impl ReactionRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace the count for (post, type).
    pub async fn upsert(
        &self,
        post_id: &str,
        reaction_type: &str,
        count: i64,
    ) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;

        diesel::replace_into(reactions::table)
            .values(NewReaction {
                post_id,
                reaction_type,
                count,
            })
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    /// Upsert many reactions; returns the number processed.
    pub async fn upsert_batch(&self, batch: &[Reaction]) -> Result<usize, DieselError> {
        for reaction in batch {
            self.upsert(&reaction.post_id, &reaction.reaction_type, reaction.count)
                .await?;
        }

        Ok(batch.len())
    }

    /// Get all reactions for a post.
    pub async fn get_by_post(&self, post_id: &str) -> Result<Vec<Reaction>, DieselError> {
        let mut conn = self.pool.get().await?;

        reactions::table
            .filter(reactions::post_id.eq(post_id))
            .load::<ReactionRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(Reaction::from).collect())
    }
}
