use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};
use wp_client::{Client, Config, Params};

fn client_for(server: &MockServer) -> Client {
    Client::new(Config::new(server.uri().parse().unwrap())).unwrap()
}

fn post_bodies(range: std::ops::Range<u64>) -> serde_json::Value {
    json!(range
        .map(|id| json!({ "id": id, "title": { "rendered": format!("post {id}") } }))
        .collect::<Vec<_>>())
}

#[tokio::test]
async fn list_reads_pagination_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp/v2/posts"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-Total", "25")
                .insert_header("X-WP-TotalPages", "3")
                .set_body_json(post_bodies(10..20)),
        )
        .mount(&server)
        .await;

    let page = client_for(&server)
        .posts()
        .list(Params::new().with("page", 2u64).with("per_page", 10u64))
        .await
        .unwrap();
    assert_eq!(page.meta.total, 25);
    assert_eq!(page.meta.total_pages, 3);
    assert_eq!(page.meta.page, 2);
    assert!(page.meta.has_more);
    assert_eq!(page.items.len(), 10);
}

#[tokio::test]
async fn list_without_headers_reports_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp/v2/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_bodies(0..4)))
        .mount(&server)
        .await;

    let page = client_for(&server).posts().list(Params::new()).await.unwrap();
    assert_eq!(page.meta.total, 4);
    assert_eq!(page.meta.total_pages, 1);
    assert!(!page.meta.has_more);
}

#[tokio::test]
async fn list_all_fetches_every_page_in_order() {
    let server = MockServer::start().await;
    for page in 1u64..=3 {
        let len = if page == 3 { 7 } else { 100 };
        let start = (page - 1) * 100;
        Mock::given(method("GET"))
            .and(path("/wp/v2/posts"))
            .and(query_param("page", page.to_string()))
            .and(query_param("per_page", "100"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-WP-Total", "207")
                    .insert_header("X-WP-TotalPages", "3")
                    .set_body_json(post_bodies(start..start + len)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let posts = client_for(&server)
        .posts()
        .list_all(Params::new())
        .await
        .unwrap();
    assert_eq!(posts.len(), 207);
    let ids: Vec<u64> = posts.iter().map(|post| post.id).collect();
    assert_eq!(ids, (0..207).collect::<Vec<_>>());
}

#[tokio::test]
async fn pages_stream_walks_one_page_at_a_time() {
    let server = MockServer::start().await;
    for page in 1u64..=2 {
        Mock::given(method("GET"))
            .and(path("/wp/v2/comments"))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-WP-Total", "6")
                    .insert_header("X-WP-TotalPages", "2")
                    .set_body_json(json!([
                        { "id": page * 10, "post": 1 },
                        { "id": page * 10 + 1, "post": 1 },
                        { "id": page * 10 + 2, "post": 1 }
                    ])),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let comments = client.comments();
    let pages: Vec<_> = comments
        .pages(Params::new())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].meta.page, 1);
    assert_eq!(pages[1].meta.page, 2);
    assert!(!pages[1].meta.has_more);
}

#[tokio::test]
async fn get_create_update_delete_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp/v2/posts/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "title": { "rendered": "seven" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/wp/v2/posts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 8, "title": { "rendered": "eight" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/wp/v2/posts/8"))
        .and(wiremock::matchers::header("x-http-method-override", "PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 8, "title": { "rendered": "eight, edited" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/wp/v2/posts/8"))
        .and(query_param("force", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deleted": true, "previous": { "id": 8 }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let posts = client.posts();

    let post = posts.get(7, Params::new()).await.unwrap();
    assert_eq!(post.title.rendered, "seven");

    let created = posts.create(&json!({ "title": "eight" })).await.unwrap();
    assert_eq!(created.id, 8);

    let updated = posts
        .update(8, &json!({ "title": "eight, edited" }))
        .await
        .unwrap();
    assert_eq!(updated.title.rendered, "eight, edited");

    let deleted = posts.delete(8, true).await.unwrap();
    assert_eq!(deleted["deleted"], json!(true));
}

#[tokio::test]
async fn post_revisions_use_nested_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp/v2/posts/7/revisions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 70, "parent": 7 },
            { "id": 71, "parent": 7 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp/v2/posts/7/revisions/71"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 71, "parent": 7 })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let revisions = client.posts().revisions(7, Params::new()).await.unwrap();
    assert_eq!(revisions.len(), 2);

    let revision = client.posts().revision(7, 71).await.unwrap();
    assert_eq!(revision.id, 71);
    assert_eq!(revision.parent, 7);
}

#[tokio::test]
async fn users_me_and_forced_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp/v2/users/me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "name": "admin" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/wp/v2/users/4"))
        .and(query_param("force", "true"))
        .and(query_param("reassign", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deleted": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let me = client.users().me(Params::new()).await.unwrap();
    assert_eq!(me.name, "admin");

    let deleted = client.users().delete(4, Some(1)).await.unwrap();
    assert_eq!(deleted["deleted"], json!(true));
}

#[tokio::test]
async fn taxonomies_map_becomes_ordered_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp/v2/taxonomies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "category": { "name": "Categories", "slug": "category", "hierarchical": true },
            "post_tag": { "name": "Tags", "slug": "post_tag", "hierarchical": false }
        })))
        .mount(&server)
        .await;

    let listing = client_for(&server)
        .taxonomies()
        .list(Params::new())
        .await
        .unwrap();
    assert_eq!(listing.items.len(), 2);
    assert_eq!(listing.meta.total_pages, 1);
    assert!(!listing.meta.has_more);
    let slugs: Vec<&str> = listing.items.iter().map(|t| t.slug.as_str()).collect();
    assert_eq!(slugs, vec!["category", "post_tag"]);
}

#[tokio::test]
async fn post_statuses_by_slug() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp/v2/statuses/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Published", "slug": "publish", "public": true
        })))
        .mount(&server)
        .await;

    let status = client_for(&server)
        .post_statuses()
        .get("publish", Params::new())
        .await
        .unwrap();
    assert_eq!(status.name, "Published");
    assert_eq!(status.public, Some(true));
}

#[tokio::test]
async fn sitemap_is_returned_as_raw_xml() {
    let server = MockServer::start().await;
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex/>"#;
    Mock::given(method("GET"))
        .and(path("/wp-sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/xml")
                .set_body_string(xml),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-sitemap-posts-post-1.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/xml")
                .set_body_string("<urlset/>"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.sitemap().index().await.unwrap(), xml);
    assert_eq!(
        client.sitemap().part("posts-post", 1).await.unwrap(),
        "<urlset/>"
    );
}

#[tokio::test]
async fn media_upload_sends_multipart_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp/v2/media"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42,
            "source_url": "https://example.com/wp-content/uploads/pixel.png",
            "mime_type": "image/png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uploaded = client_for(&server)
        .media()
        .upload(
            "pixel.png",
            "image/png",
            vec![0x89, 0x50, 0x4e, 0x47],
            &[("title".to_string(), "A pixel".to_string())],
        )
        .await
        .unwrap();
    assert_eq!(uploaded.id, 42);
    assert_eq!(uploaded.mime_type.as_deref(), Some("image/png"));

    let received = &server.received_requests().await.unwrap()[0];
    let content_type = received.headers.get("content-type").unwrap();
    assert!(content_type
        .to_str()
        .unwrap()
        .starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&received.body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"pixel.png\""));
    assert!(body.contains("name=\"title\""));
}
