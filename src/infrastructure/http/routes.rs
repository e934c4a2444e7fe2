//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                                      GET    健康检查
//! - /api/llm/providers                             GET    已注册的大模型提供方
//! - /api/structure/preview                         POST   章节结构预览
//! - /api/projects                                  GET    列出企划 / POST 创建企划
//! - /api/projects/:project_id                      GET    获取 / PUT 更新 / DELETE 删除企划
//! - /api/projects/:project_id/step                 PUT    切换写作步骤
//! - /api/projects/:project_id/characters           GET    列出 / POST 创建角色
//! - /api/projects/:project_id/characters/generate  POST   生成角色
//! - /api/projects/:project_id/plot                 GET    获取 / PUT 保存情节
//! - /api/projects/:project_id/plot/generate        POST   生成情节
//! - /api/projects/:project_id/synopsis             GET    获取 / PUT 保存梗概
//! - /api/projects/:project_id/synopsis/generate    POST   生成梗概
//! - /api/projects/:project_id/chapters             GET    列出 / POST 创建章节
//! - /api/projects/:project_id/chapters/generate    POST   生成章节大纲
//! - /api/characters/:character_id                  PUT    更新 / DELETE 删除角色
//! - /api/chapters/:chapter_id                      PUT    更新 / DELETE 删除章节
//! - /api/chapters/:chapter_id/episodes             GET    列出 / POST 创建分集
//! - /api/chapters/:chapter_id/episodes/generate    POST   生成分集
//! - /api/chapters/:chapter_id/draft                GET    获取 / PUT 保存正文
//! - /api/chapters/:chapter_id/draft/generate       POST   生成正文
//! - /api/episodes/:episode_id                      PUT    更新 / DELETE 删除分集
//! - /ws/events?project_id=                         WS     资源变更事件

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/llm/providers", get(handlers::list_providers))
        .route("/structure/preview", post(handlers::preview_structure))
        .nest("/projects", project_routes())
        .nest("/characters", character_routes())
        .nest("/chapters", chapter_routes())
        .nest("/episodes", episode_routes())
}

/// Project 路由（含企划下的角色 / 情节 / 梗概 / 章节）
fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/:project_id",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/:project_id/step", put(handlers::set_project_step))
        .route(
            "/:project_id/characters",
            get(handlers::list_characters).post(handlers::create_character),
        )
        .route(
            "/:project_id/characters/generate",
            post(handlers::generate_characters),
        )
        .route(
            "/:project_id/plot",
            get(handlers::get_plot).put(handlers::save_plot),
        )
        .route("/:project_id/plot/generate", post(handlers::generate_plot))
        .route(
            "/:project_id/synopsis",
            get(handlers::get_synopsis).put(handlers::save_synopsis),
        )
        .route(
            "/:project_id/synopsis/generate",
            post(handlers::generate_synopsis),
        )
        .route(
            "/:project_id/chapters",
            get(handlers::list_chapters).post(handlers::create_chapter),
        )
        .route(
            "/:project_id/chapters/generate",
            post(handlers::generate_chapters),
        )
}

/// Character 路由
fn character_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/:character_id",
        put(handlers::update_character).delete(handlers::delete_character),
    )
}

/// Chapter 路由（含章节下的分集 / 正文）
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/:chapter_id",
            put(handlers::update_chapter).delete(handlers::delete_chapter),
        )
        .route(
            "/:chapter_id/episodes",
            get(handlers::list_episodes).post(handlers::create_episode),
        )
        .route(
            "/:chapter_id/episodes/generate",
            post(handlers::generate_episodes),
        )
        .route(
            "/:chapter_id/draft",
            get(handlers::get_draft).put(handlers::save_draft),
        )
        .route("/:chapter_id/draft/generate", post(handlers::generate_draft))
}

/// Episode 路由
fn episode_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/:episode_id",
        put(handlers::update_episode).delete(handlers::delete_episode),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::application::{LlmRegistry, StoryRepositoryPort};
    use crate::infrastructure::adapters::llm::FakeLlmClient;
    use crate::infrastructure::events::{ChangeAction, EventPublisher, ResourceKind, WsEvent};
    use crate::infrastructure::persistence::InMemoryStoryRepository;

    struct TestApp {
        router: Router,
        events: Arc<EventPublisher>,
    }

    fn test_app(llm: FakeLlmClient) -> TestApp {
        let repo: Arc<dyn StoryRepositoryPort> = Arc::new(InMemoryStoryRepository::new());
        let registry = Arc::new(LlmRegistry::new("ollama").register(Arc::new(llm)));
        let events = Arc::new(EventPublisher::new());
        let state = Arc::new(AppState::new(repo, registry, events.clone()));

        TestApp {
            router: create_routes().with_state(state),
            events,
        }
    }

    impl TestApp {
        async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> Value {
            let builder = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            serde_json::from_slice(&bytes).unwrap()
        }

        async fn create_project(&self, title: &str) -> String {
            let body = self
                .call(
                    Method::POST,
                    "/api/projects",
                    Some(json!({ "title": title, "genre": "ミステリー" })),
                )
                .await;
            assert_eq!(body["errno"], 0);
            body["data"]["id"].as_str().unwrap().to_string()
        }
    }

    #[tokio::test]
    async fn test_ping() {
        let app = test_app(FakeLlmClient::new("ollama"));
        let body = app.call(Method::GET, "/api/ping", None).await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["default_provider"], "ollama");
    }

    #[tokio::test]
    async fn test_project_lifecycle() {
        let app = test_app(FakeLlmClient::new("ollama"));
        let id = app.create_project("夜行列車").await;

        let body = app
            .call(Method::GET, &format!("/api/projects/{}", id), None)
            .await;
        assert_eq!(body["data"]["title"], "夜行列車");
        assert_eq!(body["data"]["current_step"], 1);

        let body = app
            .call(
                Method::PUT,
                &format!("/api/projects/{}/step", id),
                Some(json!({ "step": 4 })),
            )
            .await;
        assert_eq!(body["data"]["current_step"], 4);
        assert_eq!(body["data"]["step_name"], "chapters");

        let body = app
            .call(
                Method::PUT,
                &format!("/api/projects/{}/step", id),
                Some(json!({ "step": 7 })),
            )
            .await;
        assert_eq!(body["errno"], 400);

        let body = app.call(Method::GET, "/api/projects", None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let body = app
            .call(Method::DELETE, &format!("/api/projects/{}", id), None)
            .await;
        assert_eq!(body["errno"], 0);

        let body = app
            .call(Method::GET, &format!("/api/projects/{}", id), None)
            .await;
        assert_eq!(body["errno"], 404);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_invalid_input_is_enveloped() {
        let app = test_app(FakeLlmClient::new("ollama"));

        let body = app
            .call(Method::GET, "/api/projects/not-a-uuid", None)
            .await;
        assert_eq!(body["errno"], 400);

        let body = app
            .call(Method::POST, "/api/projects", Some(json!({ "title": "" })))
            .await;
        assert_eq!(body["errno"], 400);

        let body = app
            .call(Method::POST, "/api/projects", Some(json!({ "genre": "SF" })))
            .await;
        assert_eq!(body["errno"], 400);
    }

    #[tokio::test]
    async fn test_structure_preview() {
        let app = test_app(FakeLlmClient::new("ollama"));
        let body = app
            .call(
                Method::POST,
                "/api/structure/preview",
                Some(json!({
                    "total_chapters": 10,
                    "structure": "kishotenketsu",
                    "estimated_length": 50000
                })),
            )
            .await;

        assert_eq!(body["errno"], 0);
        let phases = body["data"]["phases"].as_array().unwrap();
        assert_eq!(phases.len(), 4);
        assert_eq!(phases[0]["chapters"], json!([1, 2, 3]));
        assert_eq!(phases[3]["chapters"], json!([10]));
        assert_eq!(body["data"]["estimate"]["estimated_words"], 5000);
        assert_eq!(body["data"]["estimate"]["estimated_reading_time"], 20);

        let body = app
            .call(
                Method::POST,
                "/api/structure/preview",
                Some(json!({
                    "total_chapters": 0,
                    "structure": "kishotenketsu",
                    "estimated_length": 50000
                })),
            )
            .await;
        assert_eq!(body["errno"], 400);
    }

    #[tokio::test]
    async fn test_oversized_chapter_total_is_rejected() {
        let app = test_app(FakeLlmClient::new("ollama"));
        let id = app.create_project("長い旅").await;

        let body = app
            .call(
                Method::POST,
                "/api/structure/preview",
                Some(json!({
                    "total_chapters": 4_000_000_000u64,
                    "structure": "kishotenketsu",
                    "estimated_length": 1
                })),
            )
            .await;
        assert_eq!(body["errno"], 400);

        let body = app
            .call(
                Method::POST,
                &format!("/api/projects/{}/chapters", id),
                Some(json!({
                    "plan": { "total_chapters": 10_001, "estimated_length": 30000 }
                })),
            )
            .await;
        assert_eq!(body["errno"], 400);

        let body = app
            .call(
                Method::POST,
                &format!("/api/projects/{}/chapters", id),
                Some(json!({ "number": 4_294_967_295u64 })),
            )
            .await;
        assert_eq!(body["errno"], 400);

        let body = app
            .call(Method::GET, &format!("/api/projects/{}/chapters", id), None)
            .await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_chapter_with_plan_uses_saved_plot_structure() {
        let app = test_app(FakeLlmClient::new("ollama"));
        let id = app.create_project("灯台").await;

        app.call(
            Method::PUT,
            &format!("/api/projects/{}/plot", id),
            Some(json!({ "theme": "喪失", "structure": "three-act" })),
        )
        .await;

        let body = app
            .call(
                Method::POST,
                &format!("/api/projects/{}/chapters", id),
                Some(json!({
                    "number": 9,
                    "plan": { "total_chapters": 10, "estimated_length": 30000 }
                })),
            )
            .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["structure"], "第三幕");
        assert_eq!(body["data"]["estimated_words"], 3000);
        assert_eq!(body["data"]["estimated_reading_time"], 12);

        let body = app
            .call(
                Method::POST,
                &format!("/api/projects/{}/chapters", id),
                Some(json!({ "number": 9 })),
            )
            .await;
        assert_eq!(body["errno"], 409);
    }

    #[tokio::test]
    async fn test_draft_round_trip_and_cascade() {
        let app = test_app(FakeLlmClient::new("ollama"));
        let id = app.create_project("雨の街").await;

        let body = app
            .call(
                Method::POST,
                &format!("/api/projects/{}/chapters", id),
                Some(json!({ "title": "序" })),
            )
            .await;
        let chapter_id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["structure"], "unclassified");

        let body = app
            .call(Method::GET, &format!("/api/chapters/{}/draft", chapter_id), None)
            .await;
        assert_eq!(body["errno"], 0);
        assert!(body["data"].is_null());

        let body = app
            .call(
                Method::PUT,
                &format!("/api/chapters/{}/draft", chapter_id),
                Some(json!({ "content": "雨が降っていた。" })),
            )
            .await;
        assert_eq!(body["data"]["char_count"], 8);

        app.call(
            Method::POST,
            &format!("/api/chapters/{}/episodes", chapter_id),
            Some(json!({ "title": "傘" })),
        )
        .await;

        app.call(Method::DELETE, &format!("/api/chapters/{}", chapter_id), None)
            .await;

        let body = app
            .call(
                Method::GET,
                &format!("/api/chapters/{}/episodes", chapter_id),
                None,
            )
            .await;
        assert_eq!(body["errno"], 404);
    }

    #[tokio::test]
    async fn test_generate_characters_with_fake_provider() {
        let llm = FakeLlmClient::new("ollama").reply(
            r#"```json
[{"name":"真壁","role":"探偵"},{"name":"","role":"?"},{"name":"早苗","role":"依頼人"}]
```"#,
        );
        let app = test_app(llm);
        let id = app.create_project("霧の館").await;

        let body = app
            .call(
                Method::POST,
                &format!("/api/projects/{}/characters/generate", id),
                Some(json!({ "count": 2 })),
            )
            .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["provider"], "ollama");
        let names: Vec<&str> = body["data"]["result"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["真壁", "早苗"]);

        // 生成结果不落库
        let body = app
            .call(
                Method::GET,
                &format!("/api/projects/{}/characters", id),
                None,
            )
            .await;
        assert!(body["data"].as_array().unwrap().is_empty());

        let body = app
            .call(
                Method::POST,
                &format!("/api/projects/{}/plot/generate", id),
                Some(json!({ "provider": "openai" })),
            )
            .await;
        assert_eq!(body["errno"], 400);
    }

    #[tokio::test]
    async fn test_generate_with_exhausted_provider_is_unavailable() {
        let app = test_app(FakeLlmClient::new("ollama"));
        let id = app.create_project("砂の器").await;

        let body = app
            .call(
                Method::POST,
                &format!("/api/projects/{}/synopsis/generate", id),
                Some(json!({})),
            )
            .await;
        assert_eq!(body["errno"], 503);
    }

    #[tokio::test]
    async fn test_mutations_publish_events() {
        let app = test_app(FakeLlmClient::new("ollama"));
        let mut global = app.events.subscribe_global();

        let id = app.create_project("北の港").await;
        let body = app
            .call(
                Method::POST,
                &format!("/api/projects/{}/characters", id),
                Some(json!({ "name": "汐里" })),
            )
            .await;
        let character_id = body["data"]["id"].as_str().unwrap().to_string();

        match global.recv().await.unwrap() {
            WsEvent::ProjectChanged { action, .. } => assert_eq!(action, ChangeAction::Created),
            other => panic!("unexpected event: {:?}", other),
        }
        match global.recv().await.unwrap() {
            WsEvent::ResourceChanged {
                resource,
                resource_id,
                ..
            } => {
                assert_eq!(resource, ResourceKind::Character);
                assert_eq!(resource_id.to_string(), character_id);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
