use axum::http::StatusCode;
// Diff-style failures make byte-contract mismatches readable.
use pretty_assertions::assert_eq;

use crate::common::{
    bearer_for, create_county, create_invoice, get_raw, mark_sent, seed_user, test_app,
    OWNER_EMAIL,
};

#[tokio::test]
async fn csv_export_matches_byte_contract() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);
    let county = create_county(&app, &token, "King", Some("csv_line_per_invoice")).await;

    let id = create_invoice(
        &app,
        &token,
        Some(county),
        "A1",
        "Smith v. Turner",
        "Reed",
        3.5,
        250.0,
    )
    .await;
    mark_sent(&app, &token, id).await;

    let (status, headers, bytes) = get_raw(
        &app,
        &format!("/api/counties/{county}/export"),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get("content-type").unwrap().to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        headers
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap(),
        "attachment; filename=\"king-report.csv\""
    );
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "\"Case Number\",\"Matter\",\"Bill To\",\"Hours\",\"Rate\",\"Total\"\n\
         \"A1\",\"Smith v. Turner\",\"Reed\",\"3.50\",\"250.00\",\"875.00\"\n"
    );
}

#[tokio::test]
async fn csv_export_of_empty_county_is_header_only() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);
    let county = create_county(&app, &token, "King", Some("csv_line_per_invoice")).await;

    let (status, _headers, bytes) = get_raw(
        &app,
        &format!("/api/counties/{county}/export"),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "\"Case Number\",\"Matter\",\"Bill To\",\"Hours\",\"Rate\",\"Total\"\n"
    );
}

#[tokio::test]
async fn csv_rows_are_newest_first() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);
    let county = create_county(&app, &token, "King", Some("csv_line_per_invoice")).await;

    for (i, case) in ["A1", "B2", "C3"].into_iter().enumerate() {
        let id =
            create_invoice(&app, &token, Some(county), case, "Matter", "Reed", 1.0, 100.0).await;
        mark_sent(&app, &token, id).await;
        // Spread created_at out so ordering does not depend on insert timing.
        sqlx::query("UPDATE invoices SET created_at = NOW() + ($2 * interval '1 second') WHERE id = $1")
            .bind(id)
            .bind(i as i32)
            .execute(&pool)
            .await
            .unwrap();
    }

    let (status, _headers, bytes) = get_raw(
        &app,
        &format!("/api/counties/{county}/export"),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    let c3 = text.find("\"C3\"").unwrap();
    let b2 = text.find("\"B2\"").unwrap();
    let a1 = text.find("\"A1\"").unwrap();
    assert!(c3 < b2 && b2 < a1, "expected newest first: {text}");
}

#[tokio::test]
async fn format_override_forces_csv_from_pdf_county() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);
    let county = create_county(&app, &token, "Pierce", Some("pdf_line_per_invoice")).await;

    let (status, headers, bytes) = get_raw(
        &app,
        &format!("/api/counties/{county}/export?format=csv"),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(String::from_utf8(bytes).unwrap().starts_with("\"Case Number\""));
}

#[tokio::test]
async fn fields_with_commas_and_quotes_stay_intact() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);
    let county = create_county(&app, &token, "King", Some("csv_line_per_invoice")).await;

    let id = create_invoice(
        &app,
        &token,
        Some(county),
        "B2",
        "Doe \"Junior\", et al.",
        "Smith, Reed",
        1.0,
        100.0,
    )
    .await;
    mark_sent(&app, &token, id).await;

    let (_, _, bytes) = get_raw(
        &app,
        &format!("/api/counties/{county}/export"),
        Some(&token),
    )
    .await;

    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("\"Doe \"\"Junior\"\", et al.\""));
    assert!(text.contains("\"Smith, Reed\""));
}
