mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{task_path, TestApp};

#[tokio::test]
async fn create_returns_created_task_with_defaults() -> Result<()> {
    let app = TestApp::new();
    let (user_id, token) = TestApp::user();

    let res = app.post("/api/tasks", &token, json!({ "title": "Buy milk" })).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["message"], "Task created successfully");

    let task = &res.body["data"];
    assert!(Uuid::parse_str(task["id"].as_str().unwrap_or_default()).is_ok());
    assert_eq!(task["title"], "Buy milk");
    assert_eq!(task["description"], "");
    assert_eq!(task["completed"], false);
    assert_eq!(task["owner_id"], user_id.to_string());
    assert_eq!(task["created_at"], task["updated_at"]);
    assert!(task.get("seq").is_none());
    Ok(())
}

#[tokio::test]
async fn get_round_trips_created_task() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = TestApp::user();

    let created = app
        .create_task(
            &token,
            json!({ "title": "Read book", "description": "chapter 4", "completed": true }),
        )
        .await?;

    let res = app.get(&task_path(&created), &token).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["data"], created);
    Ok(())
}

#[tokio::test]
async fn list_is_newest_first_with_count() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = TestApp::user();

    for title in ["T1 first", "T2 second", "T3 third"] {
        app.create_task(&token, json!({ "title": title })).await?;
    }

    let res = app.get("/api/tasks", &token).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["count"], 3);
    assert_eq!(
        app.list_titles(&token).await?,
        vec!["T3 third", "T2 second", "T1 first"]
    );

    // Stable across repeated reads.
    assert_eq!(
        app.list_titles(&token).await?,
        vec!["T3 third", "T2 second", "T1 first"]
    );
    Ok(())
}

#[tokio::test]
async fn empty_list_has_zero_count() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = TestApp::user();

    let res = app.get("/api/tasks", &token).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["count"], 0);
    assert_eq!(res.body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn update_changes_only_provided_fields() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = TestApp::user();
    let task = app
        .create_task(&token, json!({ "title": "Write report", "description": "Q3 numbers" }))
        .await?;
    let path = task_path(&task);

    let res = app.put(&path, &token, json!({ "completed": true })).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Task updated successfully");

    let updated = res.body["data"].clone();
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Write report");
    assert_eq!(updated["description"], "Q3 numbers");
    assert_eq!(updated["created_at"], task["created_at"]);

    // Applying the same payload again changes nothing visible but the stamp.
    let again = app.put(&path, &token, json!({ "completed": true })).await?;
    assert_eq!(again.body["data"]["completed"], true);
    assert_eq!(again.body["data"]["title"], updated["title"]);
    assert_eq!(again.body["data"]["description"], updated["description"]);
    Ok(())
}

#[tokio::test]
async fn update_distinguishes_empty_from_absent() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = TestApp::user();
    let task = app
        .create_task(
            &token,
            json!({ "title": "Clean desk", "description": "today", "completed": true }),
        )
        .await?;
    let path = task_path(&task);

    let res = app
        .put(&path, &token, json!({ "description": "", "completed": false }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["description"], "");
    assert_eq!(res.body["data"]["completed"], false);
    assert_eq!(res.body["data"]["title"], "Clean desk");

    // null is "not provided"
    let res = app.put(&path, &token, json!({ "title": null })).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["title"], "Clean desk");
    Ok(())
}

#[tokio::test]
async fn update_trims_title() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = TestApp::user();
    let task = app.create_task(&token, json!({ "title": "Draft" })).await?;

    let res = app
        .put(&task_path(&task), &token, json!({ "title": "   Final copy   " }))
        .await?;
    assert_eq!(res.body["data"]["title"], "Final copy");
    Ok(())
}

#[tokio::test]
async fn delete_returns_final_state_then_not_found() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = TestApp::user();
    let task = app.create_task(&token, json!({ "title": "Temporary" })).await?;
    let path = task_path(&task);

    let res = app.delete(&path, &token).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Task deleted successfully");
    assert_eq!(res.body["data"], task);

    let res = app.get(&path, &token).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.delete(&path, &token).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        res.body["message"],
        "Task not found or you do not have permission to delete it"
    );
    Ok(())
}

#[tokio::test]
async fn malformed_ids_are_client_errors() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = TestApp::user();

    for res in [
        app.get("/api/tasks/12345", &token).await?,
        app.put("/api/tasks/12345", &token, json!({ "completed": true })).await?,
        app.delete("/api/tasks/12345", &token).await?,
        // Percent-encoded bytes that are not UTF-8 never reach id parsing.
        app.get("/api/tasks/%FF", &token).await?,
        app.put("/api/tasks/%FF", &token, json!({ "completed": true })).await?,
        app.delete("/api/tasks/%FF%FE", &token).await?,
    ] {
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["code"], "INVALID_IDENTIFIER");
        assert_eq!(res.body["message"], "Invalid task ID format");
    }
    Ok(())
}

#[tokio::test]
async fn storage_failure_is_a_generic_internal_error() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = TestApp::user();
    app.store.set_offline(true);

    let res = app.get("/api/tasks", &token).await?;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["code"], "INTERNAL_ERROR");
    assert_eq!(res.body["message"], "Server error while fetching tasks");

    let res = app.post("/api/tasks", &token, json!({ "title": "Valid" })).await?;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["message"], "Server error while creating task");
    assert!(!res.body.to_string().contains("offline"));
    Ok(())
}
