use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};
use simrec_core::{ProductId, RecommendationRecord, Recommender, DEFAULT_RECOMMENDATIONS};
use std::sync::Arc;
use tracing::info;

pub const NO_RECOMMENDATIONS: &str = "No recommendations found for the selected product.";

/// Request limits for the REST surface
#[derive(Debug, Clone, Copy)]
pub struct ApiSettings {
    pub default_count: usize,
    pub max_count: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            default_count: DEFAULT_RECOMMENDATIONS,
            max_count: 10,
        }
    }
}

impl ApiSettings {
    /// Requested count, defaulted and clamped to `1..=max_count`
    pub fn effective_count(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_count)
            .clamp(1, self.max_count.max(1))
    }
}

#[derive(Deserialize)]
struct CountQuery {
    count: Option<usize>,
}

#[derive(Deserialize)]
struct ByNameQuery {
    category: String,
    name: String,
    count: Option<usize>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    products: usize,
    indexed: usize,
}

#[derive(Serialize)]
struct ProductChoice {
    product_id: ProductId,
    name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RecommendationResponse {
    pub product_id: ProductId,
    pub recommendations: Vec<RecommendationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecommendationResponse {
    fn new(product_id: ProductId, recommendations: Vec<RecommendationRecord>) -> Self {
        let message = recommendations.is_empty().then(|| NO_RECOMMENDATIONS.to_string());
        Self { product_id, recommendations, message }
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        recommender: Arc<Recommender>,
        settings: ApiSettings,
        port: u16,
    ) -> std::io::Result<()> {
        info!(port, max_count = settings.max_count, "binding REST API");
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(recommender.clone()))
                .app_data(web::Data::new(settings))
                .configure(RestApi::configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Register routes; expects `Data<Arc<Recommender>>` and `Data<ApiSettings>`
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.route("/health", web::get().to(health))
            .route("/categories", web::get().to(list_categories))
            .route("/categories/{category}/products", web::get().to(list_category_products))
            .route("/products/{id}/recommendations", web::get().to(product_recommendations))
            .route("/recommendations", web::get().to(recommend_by_name));
    }
}

async fn health(recommender: web::Data<Arc<Recommender>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        products: recommender.catalog().len(),
        indexed: recommender.matrix().len(),
    }))
}

async fn list_categories(recommender: web::Data<Arc<Recommender>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(recommender.catalog().categories()))
}

async fn list_category_products(
    recommender: web::Data<Arc<Recommender>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let category = path.into_inner();
    let catalog = recommender.catalog();

    let choices: Vec<ProductChoice> = catalog
        .product_names(&category)
        .into_iter()
        .filter_map(|name| {
            catalog.resolve_name(&category, name).map(|id| ProductChoice {
                product_id: id.clone(),
                name: name.to_string(),
            })
        })
        .collect();

    if choices.is_empty() {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Category not found"
        })));
    }
    Ok(HttpResponse::Ok().json(choices))
}

async fn product_recommendations(
    recommender: web::Data<Arc<Recommender>>,
    settings: web::Data<ApiSettings>,
    path: web::Path<String>,
    query: web::Query<CountQuery>,
) -> ActixResult<HttpResponse> {
    let product_id = ProductId::from(path.into_inner());
    let count = settings.effective_count(query.count);

    let records = recommender.recommend(&product_id, count);
    Ok(HttpResponse::Ok().json(RecommendationResponse::new(product_id, records)))
}

async fn recommend_by_name(
    recommender: web::Data<Arc<Recommender>>,
    settings: web::Data<ApiSettings>,
    query: web::Query<ByNameQuery>,
) -> ActixResult<HttpResponse> {
    let Some(product_id) = recommender
        .catalog()
        .resolve_name(&query.category, &query.name)
        .cloned()
    else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Product not found in category"
        })));
    };

    let count = settings.effective_count(query.count);
    let records = recommender.recommend(&product_id, count);
    Ok(HttpResponse::Ok().json(RecommendationResponse::new(product_id, records)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use simrec_core::{Catalog, Product, SimilarityMatrix};

    fn recommender() -> Arc<Recommender> {
        let catalog = Catalog::new(vec![
            Product::new("1", "Alpha", "Acme", 10.0).with_category("Skincare"),
            Product::new("2", "Beta", "Acme", 20.0).with_category("Skincare"),
            Product::new("3", "Gamma", "Glow", 30.0).with_category("Makeup"),
            Product::new("4", "Alpha", "Other", 5.0).with_category("Skincare"),
        ]);
        let row = |id: &str, cells: &[(&str, f64)]| {
            (
                ProductId::from(id),
                cells.iter().map(|(c, s)| (ProductId::from(*c), *s)).collect::<Vec<_>>(),
            )
        };
        let matrix = SimilarityMatrix::from_rows(vec![
            row("1", &[("1", 1.0), ("2", 0.3), ("3", 0.8), ("4", 0.5)]),
            row("2", &[("2", 1.0), ("1", 0.3)]),
            row("3", &[("3", 1.0)]),
        ])
        .unwrap();
        Arc::new(Recommender::new(catalog, matrix))
    }

    macro_rules! app {
        ($settings:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(recommender()))
                    .app_data(web::Data::new($settings))
                    .configure(RestApi::configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_effective_count() {
        let settings = ApiSettings::default();
        assert_eq!(settings.effective_count(None), 5);
        assert_eq!(settings.effective_count(Some(0)), 1);
        assert_eq!(settings.effective_count(Some(3)), 3);
        assert_eq!(settings.effective_count(Some(50)), 10);
    }

    #[actix_web::test]
    async fn test_health() {
        let app = app!(ApiSettings::default());
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, serde_json::json!({"status": "ok", "products": 4, "indexed": 3}));
    }

    #[actix_web::test]
    async fn test_categories() {
        let app = app!(ApiSettings::default());
        let req = test::TestRequest::get().uri("/categories").to_request();
        let body: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, vec!["Makeup", "Skincare"]);
    }

    #[actix_web::test]
    async fn test_category_products_distinct_names() {
        let app = app!(ApiSettings::default());
        let req = test::TestRequest::get().uri("/categories/Skincare/products").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            serde_json::json!([
                {"product_id": "1", "name": "Alpha"},
                {"product_id": "2", "name": "Beta"}
            ])
        );

        let req = test::TestRequest::get().uri("/categories/Fragrance/products").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_product_recommendations() {
        let app = app!(ApiSettings::default());
        let req = test::TestRequest::get().uri("/products/1/recommendations?count=2").to_request();
        let body: RecommendationResponse = test::call_and_read_body_json(&app, req).await;

        let names: Vec<&str> = body.recommendations.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Alpha"]);
        assert_eq!(body.recommendations[1].brand, "Other");
        assert!(body.message.is_none());
    }

    #[actix_web::test]
    async fn test_count_clamped_to_max() {
        let app = app!(ApiSettings { default_count: 5, max_count: 1 });
        let req = test::TestRequest::get().uri("/products/1/recommendations?count=9").to_request();
        let body: RecommendationResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.recommendations.len(), 1);
    }

    #[actix_web::test]
    async fn test_unknown_product_is_empty_not_error() {
        let app = app!(ApiSettings::default());
        let req = test::TestRequest::get().uri("/products/ZZZ/recommendations").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: RecommendationResponse = test::read_body_json(resp).await;
        assert!(body.recommendations.is_empty());
        assert_eq!(body.message.as_deref(), Some(NO_RECOMMENDATIONS));
    }

    #[actix_web::test]
    async fn test_recommend_by_name() {
        let app = app!(ApiSettings::default());
        let req = test::TestRequest::get()
            .uri("/recommendations?category=Skincare&name=Beta&count=5")
            .to_request();
        let body: RecommendationResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.product_id.as_str(), "2");
        assert_eq!(body.recommendations.len(), 1);
        assert_eq!(body.recommendations[0].name, "Alpha");

        let req = test::TestRequest::get()
            .uri("/recommendations?category=Makeup&name=Beta")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
