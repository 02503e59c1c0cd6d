//! Raw translation markers for the back-office quality reports
//!
//! Reads `translated_languages` as stored, without normalization, so the
//! untranslated detector can tell a real list from a legacy scalar.

use shared::menu::RawTags;
use shared::menu::quality::{ContentKind, ContentMarker};
use sqlx::SqlitePool;

use crate::error::ServiceResult;

pub async fn content_markers(
    pool: &SqlitePool,
    restaurant_id: i64,
) -> ServiceResult<Vec<ContentMarker>> {
    let mut markers = Vec::new();
    for (kind, table) in [
        (ContentKind::Dish, "dishes"),
        (ContentKind::Ingredient, "ingredients"),
        (ContentKind::Category, "categories"),
    ] {
        let rows: Vec<(i64, String, Option<String>)> = sqlx::query_as(&format!(
            "SELECT id, name, translated_languages FROM {table} \
             WHERE restaurant_id = ? ORDER BY name"
        ))
        .bind(restaurant_id)
        .fetch_all(pool)
        .await?;

        markers.extend(rows.into_iter().map(|(id, name, marker)| ContentMarker {
            kind,
            id,
            name,
            marker: RawTags::from_column(marker.as_deref()),
        }));
    }
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{restaurant, test_pool};
    use shared::menu::quality::untranslated_report;

    #[tokio::test]
    async fn markers_are_scoped_and_raw() {
        let pool = test_pool().await;
        let own = restaurant(&pool, "Own").await;
        let other = restaurant(&pool, "Other").await;

        for (id, rid, marker) in [
            (1, own.id, Some(r#"["sv"]"#)),
            (2, own.id, Some("sv")),
            (3, own.id, None),
            (4, other.id, None),
        ] {
            sqlx::query(
                "INSERT INTO dishes \
                 (id, restaurant_id, name, translated_languages, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, 0, 0)",
            )
            .bind(id)
            .bind(rid)
            .bind(format!("Dish {id}"))
            .bind(marker)
            .execute(&pool)
            .await
            .unwrap();
        }

        let markers = content_markers(&pool, own.id).await.unwrap();
        assert_eq!(markers.len(), 3);

        let report = untranslated_report(markers);
        let ids: Vec<i64> = report.dishes.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(report.total_untranslated, 2);
    }
}
