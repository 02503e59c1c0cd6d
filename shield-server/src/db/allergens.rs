//! Global allergen translations (not tenant scoped)

use shared::menu::Translations;
use shared::models::{AllergenTranslation, AllergenTranslationMap};
use sqlx::SqlitePool;

use crate::error::ServiceResult;

pub async fn list(pool: &SqlitePool) -> ServiceResult<Vec<AllergenTranslation>> {
    let rows: Vec<(String, Option<String>)> = sqlx::query_as(
        "SELECT allergen_key, translations FROM allergen_translations ORDER BY allergen_key",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(allergen_key, translations)| AllergenTranslation {
            allergen_key,
            translations: Translations::from_stored(translations.as_deref()),
        })
        .collect())
}

/// Allergen key → translations
pub async fn translation_map(pool: &SqlitePool) -> ServiceResult<AllergenTranslationMap> {
    Ok(list(pool)
        .await?
        .into_iter()
        .map(|t| (t.allergen_key, t.translations))
        .collect())
}

pub async fn count(pool: &SqlitePool) -> ServiceResult<usize> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM allergen_translations")
        .fetch_one(pool)
        .await?;
    Ok(usize::try_from(n).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_pool;

    #[tokio::test]
    async fn seeded_translations_are_readable() {
        let pool = test_pool().await;
        let map = translation_map(&pool).await.unwrap();
        assert_eq!(map.len(), count(&pool).await.unwrap());

        let dairy = map.get("dairy").unwrap();
        assert_eq!(dairy.get("sv").and_then(|t| t.name.as_deref()), Some("Mjölk"));
        assert_eq!(dairy.get("fi").and_then(|t| t.name.as_deref()), Some("Maito"));
    }
}
