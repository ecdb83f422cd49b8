mod common;

use actix_web::{test, App};
use serde_json::Value;

use ac_core::traits::CmsRepo;

use common::{multipart_body, multipart_content_type, mount_all, TestCtx};

#[actix_web::test]
async fn create_requires_fields_and_images() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let body = multipart_body(&[("title", "Vernissage")], &[]);
    let req = test::TestRequest::post()
        .uri("/painting-news/create")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    assert!(ctx.repo.list_paintings().await.unwrap().is_empty());
    assert!(ctx.stored().is_empty());
}

#[actix_web::test]
async fn create_then_update_by_body_id() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let body = multipart_body(
        &[("title", "Vernissage"), ("body", "new series")],
        &[("cover", "oil.jpg", b"oil")],
    );
    let req = test::TestRequest::post()
        .uri("/painting-news/create")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let json: Value = test::read_body_json(resp).await;
    let id = json["id"].as_i64().unwrap();

    // The update takes its identifier from the form body, not the path.
    let id_field = id.to_string();
    let body = multipart_body(
        &[("id", &id_field), ("title", "Vernissage II"), ("body", "new series")],
        &[],
    );
    let req = test::TestRequest::put()
        .uri("/painting-news")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let post = ctx.repo.find_painting(id).await.unwrap().unwrap();
    assert_eq!(post.title, "Vernissage II");
    assert_eq!(post.cover.len(), 1, "cover preserved without new files");
    assert!(ctx.destroyed().is_empty());
}

#[actix_web::test]
async fn update_without_an_id_is_rejected() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let body = multipart_body(&[("title", "t"), ("body", "b")], &[]);
    let req = test::TestRequest::put()
        .uri("/painting-news")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn update_with_files_targets_the_old_images() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let body = multipart_body(
        &[("title", "Vernissage"), ("body", "series")],
        &[("cover", "a.jpg", b"a"), ("cover", "b.jpg", b"b")],
    );
    let req = test::TestRequest::post()
        .uri("/painting-news/create")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let json: Value = test::read_body_json(resp).await;
    let id = json["id"].as_i64().unwrap();

    let old_ids: Vec<String> = ctx
        .repo
        .find_painting(id)
        .await
        .unwrap()
        .unwrap()
        .cover
        .into_iter()
        .map(|image| image.public_id)
        .collect();

    let id_field = id.to_string();
    let body = multipart_body(
        &[("id", &id_field), ("title", "Vernissage"), ("body", "series")],
        &[("cover", "c.png", b"c")],
    );
    let req = test::TestRequest::put()
        .uri("/painting-news")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let destroyed = ctx.destroyed();
    for old in &old_ids {
        assert!(destroyed.contains(old));
    }
    let cover = ctx.repo.find_painting(id).await.unwrap().unwrap().cover;
    assert_eq!(cover.len(), 1);
    assert!(cover[0].public_id.contains("c.png"));
}

#[actix_web::test]
async fn delete_reports_the_image_count() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let body = multipart_body(
        &[("title", "Vernissage"), ("body", "series")],
        &[("cover", "a.jpg", b"a"), ("cover", "b.jpg", b"b")],
    );
    let req = test::TestRequest::post()
        .uri("/painting-news/create")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let json: Value = test::read_body_json(resp).await;
    let id = json["id"].as_i64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/painting-news/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["deletedImages"], 2);
    assert!(ctx.repo.find_painting(id).await.unwrap().is_none());

    let req = test::TestRequest::delete()
        .uri(&format!("/painting-news/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
