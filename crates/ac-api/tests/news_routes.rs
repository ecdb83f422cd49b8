mod common;

use actix_web::{test, App};
use serde_json::Value;

use ac_core::traits::CmsRepo;

use common::{multipart_body, multipart_content_type, mount_all, TestCtx};

async fn create_post<S, B>(app: &S, files: &[(&str, &str, &[u8])]) -> i64
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
    B::Error: std::fmt::Debug,
{
    let body = multipart_body(
        &[
            ("title", "Sunset"),
            ("body", "desc"),
            ("link", "https://example.com"),
        ],
        files,
    );
    let req = test::TestRequest::post()
        .uri("/news/create")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    let json: Value = test::read_body_json(resp).await;
    json["id"].as_i64().expect("create returns the new id")
}

#[actix_web::test]
async fn create_without_required_fields_leaves_no_trace() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    // Title present, body and files missing.
    let body = multipart_body(&[("title", "Sunset")], &[]);
    let req = test::TestRequest::post()
        .uri("/news/create")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    assert!(ctx.repo.list_news().await.unwrap().is_empty());
    assert!(ctx.stored().is_empty(), "nothing was uploaded");
}

#[actix_web::test]
async fn create_without_images_leaves_no_trace() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let body = multipart_body(&[("title", "Sunset"), ("body", "desc")], &[]);
    let req = test::TestRequest::post()
        .uri("/news/create")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    assert!(ctx.repo.list_news().await.unwrap().is_empty());
}

#[actix_web::test]
async fn create_keeps_one_descriptor_per_file_in_upload_order() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let id = create_post(&app, &[("cover", "a.jpg", b"aaa"), ("cover", "b.png", b"bbb")]).await;

    let post = ctx.repo.find_news(id).await.unwrap().expect("row exists");
    assert_eq!(post.cover.len(), 2);
    assert!(post.cover[0].public_id.contains("a.jpg"));
    assert!(post.cover[1].public_id.contains("b.png"));
    assert!(!post.cover[0].url.is_empty());
    assert_eq!(post.title, "Sunset");
    assert_eq!(post.link.as_deref(), Some("https://example.com"));
}

#[actix_web::test]
async fn create_rejects_oversized_files() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let oversized = vec![0u8; 5 * 1024 * 1024 + 1];
    let body = multipart_body(
        &[("title", "Sunset"), ("body", "desc")],
        &[("cover", "big.jpg", &oversized)],
    );
    let req = test::TestRequest::post()
        .uri("/news/create")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    assert!(ctx.stored().is_empty());
}

#[actix_web::test]
async fn create_rejects_unknown_formats() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let body = multipart_body(
        &[("title", "Sunset"), ("body", "desc")],
        &[("cover", "script.exe", b"MZ")],
    );
    let req = test::TestRequest::post()
        .uri("/news/create")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    assert!(ctx.stored().is_empty());
}

#[actix_web::test]
async fn update_without_files_preserves_the_cover() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let id = create_post(&app, &[("cover", "a.jpg", b"aaa")]).await;
    let before = ctx.repo.find_news(id).await.unwrap().unwrap().cover;

    let body = multipart_body(&[("title", "Sunset II"), ("body", "desc")], &[]);
    let req = test::TestRequest::put()
        .uri(&format!("/news/{id}"))
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let post = ctx.repo.find_news(id).await.unwrap().unwrap();
    assert_eq!(post.title, "Sunset II");
    assert_eq!(post.cover, before, "cover untouched");
    assert!(ctx.destroyed().is_empty(), "no image was targeted");
}

#[actix_web::test]
async fn update_with_files_replaces_the_whole_cover() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let id = create_post(&app, &[("cover", "a.jpg", b"aaa"), ("cover", "b.png", b"bbb")]).await;
    let old_ids: Vec<String> = ctx
        .repo
        .find_news(id)
        .await
        .unwrap()
        .unwrap()
        .cover
        .into_iter()
        .map(|image| image.public_id)
        .collect();

    let body = multipart_body(
        &[("title", "Sunset"), ("body", "desc")],
        &[("cover", "c.webp", b"ccc")],
    );
    let req = test::TestRequest::put()
        .uri(&format!("/news/{id}"))
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let post = ctx.repo.find_news(id).await.unwrap().unwrap();
    assert_eq!(post.cover.len(), 1, "no merge with the old cover");
    assert!(post.cover[0].public_id.contains("c.webp"));

    let destroyed = ctx.destroyed();
    for old in &old_ids {
        assert!(destroyed.contains(old), "{old} was targeted for deletion");
    }
}

#[actix_web::test]
async fn update_of_a_missing_row_is_a_404() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let body = multipart_body(&[("title", "t"), ("body", "b")], &[]);
    let req = test::TestRequest::put()
        .uri("/news/4242")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn delete_reports_the_decoded_count_and_removes_the_row() {
    let ctx = TestCtx::new().await;
    let app = test::init_service(App::new().app_data(ctx.state()).configure(mount_all)).await;

    let id = create_post(&app, &[("cover", "a.jpg", b"aaa")]).await;

    let req = test::TestRequest::delete().uri(&format!("/news/{id}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["deletedImages"], 1);

    assert!(ctx.repo.list_news().await.unwrap().is_empty());
    assert_eq!(ctx.destroyed().len(), 1);

    // Deleting again is a miss, twice.
    for _ in 0..2 {
        let req = test::TestRequest::delete().uri(&format!("/news/{id}")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
