use axum::http::StatusCode;

use crate::common::{
    bearer_for, create_county, create_invoice, get_json, mark_sent, seed_user, test_app,
    OWNER_EMAIL,
};

#[tokio::test]
async fn preview_reports_kind_totals_and_rows() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);
    let county = create_county(&app, &token, "King", Some("csv_line_per_invoice")).await;

    for (case, hours, rate) in [("A1", 3.5, 250.0), ("B2", 2.0, 200.0)] {
        let id = create_invoice(&app, &token, Some(county), case, "Matter", "Reed", hours, rate)
            .await;
        mark_sent(&app, &token, id).await;
    }
    // A draft invoice stays out of the report.
    create_invoice(&app, &token, Some(county), "C3", "Draft matter", "Lee", 9.0, 999.0).await;

    let (status, body) = get_json(
        &app,
        &format!("/api/counties/{county}/export?preview=1"),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exportKind"], "csv");
    assert_eq!(body["county"]["name"], "King");
    assert_eq!(body["totals"]["cases"], 2);
    assert_eq!(body["totals"]["hours"], 5.5);
    assert_eq!(body["totals"]["amount"], 1275.0);
    assert_eq!(body["invoices"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn preview_caps_rows_while_totals_count_everything() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);
    let county = create_county(&app, &token, "King", Some("csv_line_per_invoice")).await;

    for i in 0..26 {
        let id = create_invoice(
            &app,
            &token,
            Some(county),
            &format!("24-2-{i:05}"),
            "Matter",
            "Reed",
            1.0,
            100.0,
        )
        .await;
        mark_sent(&app, &token, id).await;
    }

    let (status, body) = get_json(
        &app,
        &format!("/api/counties/{county}/export?preview=1"),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Totals cover the full selection; the row list is a bounded sample.
    assert_eq!(body["totals"]["cases"], 26);
    assert_eq!(body["totals"]["hours"], 26.0);
    assert_eq!(body["invoices"].as_array().unwrap().len(), 25);
}

#[tokio::test]
async fn preview_respects_format_override() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);
    let county = create_county(&app, &token, "King", Some("csv_line_per_invoice")).await;

    let (status, body) = get_json(
        &app,
        &format!("/api/counties/{county}/export?preview=true&format=pdf"),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exportKind"], "pdf");
    // The stored preference is untouched.
    assert_eq!(body["county"]["reportFormat"], "csv_line_per_invoice");
}

#[tokio::test]
async fn invalid_override_falls_back_to_stored_preference() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);
    let county = create_county(&app, &token, "King", Some("pdf_grouped_by_case")).await;

    let (status, body) = get_json(
        &app,
        &format!("/api/counties/{county}/export?preview=1&format=spreadsheet"),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exportKind"], "pdf");
}

#[tokio::test]
async fn corrupt_stored_format_fails_safe_to_csv() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);
    let county = create_county(&app, &token, "King", None).await;

    // Corrupt the stored preference behind the API's back.
    sqlx::query("UPDATE counties SET report_format = 'legacy-spreadsheet' WHERE id = $1")
        .bind(county)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = get_json(
        &app,
        &format!("/api/counties/{county}/export?preview=1"),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exportKind"], "csv");
}

#[tokio::test]
async fn preview_of_empty_county_has_zero_totals() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);
    let county = create_county(&app, &token, "King", None).await;

    let (status, body) = get_json(
        &app,
        &format!("/api/counties/{county}/export?preview=1"),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["cases"], 0);
    assert_eq!(body["totals"]["hours"], 0.0);
    assert_eq!(body["totals"]["amount"], 0.0);
    assert!(body["invoices"].as_array().unwrap().is_empty());
}
