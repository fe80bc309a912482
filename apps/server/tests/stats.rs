#[allow(unused)]
mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::*;

#[tokio::test]
async fn stats_aggregate_the_whole_registry() -> anyhow::Result<()> {
    with_each_backend(|app| {
        Box::pin(async move {
            let rows = [
                ("S1", Some("Lyon"), Some("Piscines"), true),
                ("S2", Some("Lyon"), Some("Courts de tennis"), false),
                ("S3", Some("Brest"), Some("Piscines"), true),
                ("S4", Some("Angers"), Some("Courts de tennis"), false),
                ("S5", None, Some("Piscines"), false),
                ("S6", Some("Lyon"), None, false),
            ];
            for (number, commune, family, accessible) in rows {
                let mut builder = FacilityBuilder::new(number).accessible(accessible);
                if let Some(commune) = commune {
                    builder = builder.commune(commune);
                }
                if let Some(family) = family {
                    builder = builder.family(family);
                }
                app.create(&builder.build()).await?;
            }

            let (status, body) = app.get("/equipements/stats").await?;
            assert_status(status, StatusCode::OK, "stats");
            assert_eq!(body["total"], 6);
            assert_eq!(body["communes"], 3);
            assert_eq!(body["accessible"], 2);
            assert_eq!(
                body["byType"],
                json!([
                    { "equip_type_famille": "Piscines", "count": 3 },
                    { "equip_type_famille": "Courts de tennis", "count": 2 },
                ])
            );
            assert_eq!(
                body["byCommune"],
                json!([
                    { "commune_nom": "Lyon", "count": 3 },
                    { "commune_nom": "Angers", "count": 1 },
                    { "commune_nom": "Brest", "count": 1 },
                ])
            );
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn stats_on_empty_registry() -> anyhow::Result<()> {
    with_each_backend(|app| {
        Box::pin(async move {
            let (status, body) = app.get("/equipements/stats").await?;
            assert_status(status, StatusCode::OK, "stats");
            assert_eq!(
                body,
                json!({ "total": 0, "communes": 0, "accessible": 0, "byType": [], "byCommune": [] })
            );
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn top_lists_stop_at_ten() -> anyhow::Result<()> {
    with_each_backend(|app| {
        Box::pin(async move {
            for i in 0..12 {
                app.create(
                    &FacilityBuilder::new(format!("C{i:02}"))
                        .commune(&format!("Commune {i:02}"))
                        .build(),
                )
                .await?;
            }

            let (_, body) = app.get("/equipements/stats").await?;
            let by_commune = body["byCommune"].as_array().expect("byCommune array");
            assert_eq!(by_commune.len(), 10);
            assert_eq!(by_commune[0]["commune_nom"], "Commune 00");
            assert_eq!(body["communes"], 12);
            Ok(())
        })
    })
    .await
}
