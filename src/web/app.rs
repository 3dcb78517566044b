use std::{collections::BTreeMap, sync::Arc};

use async_graphql::{
    Context, EmptyMutation, EmptySubscription, Error, InputObject, Schema, SimpleObject,
    http::GraphiQLSource,
};
use async_graphql_poem::GraphQL;
use poem::{Result, Route, Server, get, handler, listener::TcpListener, web::Html};
use tracing::info;

use crate::{
    engine::{
        isochrone::{CompareOrigin, IsochroneQuery, compare, compute_isochrone},
        scoring::{profiles, resolve_weights},
    },
    structures::{
        CategoryWeight, ComparisonEntry, Config, DatasetStats, Graph, IsochroneSnapshot,
        OriginPoint, QueryConfig,
    },
};

#[derive(Debug, InputObject)]
struct CategoryWeightInput {
    category: String,
    weight: f64,
}

#[derive(Debug, InputObject)]
struct CompareOriginInput {
    label: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, SimpleObject)]
struct IsochroneResult {
    weights: Vec<CategoryWeight>,
    snapshot: IsochroneSnapshot,
}

#[derive(Debug, SimpleObject)]
struct ComparisonResult {
    max_minutes: Option<f64>,
    weights: Vec<CategoryWeight>,
    results: Vec<ComparisonEntry>,
}

#[derive(Debug, SimpleObject)]
struct ScoringProfileView {
    id: String,
    name: String,
    description: String,
    weights: Vec<CategoryWeight>,
}

#[derive(Debug, SimpleObject)]
struct AppConfig {
    poi_categories: Vec<String>,
    scoring_profiles: Vec<ScoringProfileView>,
    travel_options: Vec<u32>,
    default_location: OriginPoint,
    dataset_stats: DatasetStats,
}

pub struct QueryRoot;

#[async_graphql::Object]
impl QueryRoot {
    async fn ping(&self) -> &str {
        "pong"
    }

    async fn app_config(&self, ctx: &Context<'_>) -> Result<AppConfig, Error> {
        let graph = ctx.data::<Arc<Graph>>()?;
        let query_config = ctx.data::<QueryConfig>()?;

        let loc = graph.default_location();

        Ok(AppConfig {
            poi_categories: graph.poi_categories().to_vec(),
            scoring_profiles: profiles()
                .into_iter()
                .map(|profile| ScoringProfileView {
                    id: profile.id,
                    name: profile.name,
                    description: profile.description,
                    weights: weight_views(&profile.weights),
                })
                .collect(),
            travel_options: query_config.travel_options.clone(),
            default_location: OriginPoint {
                latitude: loc.latitude,
                longitude: loc.longitude,
            },
            dataset_stats: graph.stats(),
        })
    }

    async fn isochrone(
        &self,
        ctx: &Context<'_>,
        latitude: f64,
        longitude: f64,
        max_minutes: Option<f64>,
        categories: Option<Vec<String>>,
        profile_id: Option<String>,
        custom_weights: Option<Vec<CategoryWeightInput>>,
    ) -> Result<IsochroneResult, Error> {
        let graph = ctx.data::<Arc<Graph>>()?;

        let custom = custom_weights.map(weights_from_inputs);
        let weights = resolve_weights(profile_id.as_deref(), custom.as_ref());

        let query = IsochroneQuery {
            latitude,
            longitude,
            max_minutes,
            categories,
            weights: weights.clone(),
        };
        let snapshot = compute_isochrone(graph.as_ref(), &query);

        Ok(IsochroneResult {
            weights: weight_views(&weights),
            snapshot,
        })
    }

    async fn compare(
        &self,
        ctx: &Context<'_>,
        origins: Vec<CompareOriginInput>,
        max_minutes: Option<f64>,
        categories: Option<Vec<String>>,
        profile_id: Option<String>,
        custom_weights: Option<Vec<CategoryWeightInput>>,
    ) -> Result<ComparisonResult, Error> {
        if origins.len() < 2 {
            return Err(Error::new("Please provide two or more origins to compare"));
        }

        let graph = ctx.data::<Arc<Graph>>()?;

        let custom = custom_weights.map(weights_from_inputs);
        let weights = resolve_weights(profile_id.as_deref(), custom.as_ref());

        let origins: Vec<CompareOrigin> = origins
            .into_iter()
            .map(|origin| CompareOrigin {
                label: origin.label,
                latitude: origin.latitude,
                longitude: origin.longitude,
            })
            .collect();

        let results = compare(
            graph.as_ref(),
            &origins,
            max_minutes,
            categories.as_ref(),
            &weights,
        );

        Ok(ComparisonResult {
            max_minutes,
            weights: weight_views(&weights),
            results,
        })
    }
}

fn weights_from_inputs(inputs: Vec<CategoryWeightInput>) -> BTreeMap<String, f64> {
    inputs
        .into_iter()
        .map(|input| (input.category, input.weight))
        .collect()
}

fn weight_views(weights: &BTreeMap<String, f64>) -> Vec<CategoryWeight> {
    weights
        .iter()
        .map(|(category, weight)| CategoryWeight {
            category: category.clone(),
            weight: *weight,
        })
        .collect()
}

#[handler]
async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub fn schema(
    graph: Arc<Graph>,
    query_config: QueryConfig,
) -> Schema<QueryRoot, EmptyMutation, EmptySubscription> {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(graph)
        .data(query_config)
        .finish()
}

pub async fn server(graph: Arc<Graph>, config: &Config) -> std::io::Result<()> {
    let schema = schema(graph, config.query.clone());
    let app = Route::new()
        .at("/graphql", GraphQL::new(schema))
        .at("/graphiql", get(graphiql));

    info!("Serving on {}", config.server.bind);
    Server::new(TcpListener::bind(config.server.bind.clone()))
        .run(app)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::Value;
    use poem::test::TestClient;

    use crate::structures::{
        LatLng, Poi, RouteId, RouteInfo, ScheduledVisit, StopData, TripId, TripInfo,
    };

    fn test_graph() -> Arc<Graph> {
        let mut g = Graph::new();
        let a = g.add_stop(StopData {
            stop_id: "A".to_string(),
            name: "Alpha".to_string(),
            loc: LatLng {
                latitude: 50.80,
                longitude: 4.35,
            },
        });
        let b = g.add_stop(StopData {
            stop_id: "B".to_string(),
            name: "Beta".to_string(),
            loc: LatLng {
                latitude: 50.81,
                longitude: 4.35,
            },
        });
        g.add_routes(vec![RouteInfo {
            route_short_name: "1".to_string(),
            route_long_name: "One".to_string(),
        }]);
        g.add_trips(vec![TripInfo {
            route_id: RouteId(0),
        }]);
        g.build_adjacency(&[
            ScheduledVisit {
                trip: TripId(0),
                stop_sequence: 0,
                arrival_minutes: 99.0,
                departure_minutes: 100.0,
                stop: a,
            },
            ScheduledVisit {
                trip: TripId(0),
                stop_sequence: 1,
                arrival_minutes: 104.0,
                departure_minutes: 105.0,
                stop: b,
            },
        ]);
        g.add_poi_categories(vec![
            "Hospital".to_string(),
            "Library".to_string(),
            "Retail".to_string(),
        ]);
        g.add_pois(vec![
            Poi {
                poi_id: 1,
                name: "City Hospital".to_string(),
                category: "Hospital".to_string(),
                loc: LatLng {
                    latitude: 50.81,
                    longitude: 4.351,
                },
            },
            Poi {
                poi_id: 2,
                name: "Central Library".to_string(),
                category: "Library".to_string(),
                loc: LatLng {
                    latitude: 50.801,
                    longitude: 4.35,
                },
            },
        ]);
        Arc::new(g)
    }

    fn test_query_config() -> QueryConfig {
        QueryConfig {
            travel_options: vec![15, 30, 45, 60],
        }
    }

    fn run<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    fn object_field(value: &Value, name: &str) -> Value {
        match value {
            Value::Object(map) => match map.get(name) {
                Some(field) => field.clone(),
                None => panic!("missing field '{name}' in {value}"),
            },
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn ping_over_http() {
        run(async {
            let app = Route::new().at(
                "/graphql",
                GraphQL::new(schema(test_graph(), test_query_config())),
            );
            let cli = TestClient::new(app);

            let resp = cli
                .post("/graphql")
                .content_type("application/json")
                .body(r#"{"query":"{ ping }"}"#)
                .send()
                .await;
            resp.assert_status_is_ok();
            resp.assert_text(r#"{"data":{"ping":"pong"}}"#).await;
        });
    }

    #[test]
    fn isochrone_query_returns_a_snapshot() {
        run(async {
            let schema = schema(test_graph(), test_query_config());
            let response = schema
                .execute(
                    "{ isochrone(latitude: 50.80, longitude: 4.35) { \
                       snapshot { maxMinutes score metadata { reachedStopCount poiCount } } \
                       weights { category weight } } }",
                )
                .await;
            assert!(response.errors.is_empty(), "{:?}", response.errors);

            let iso = object_field(&response.data, "isochrone");
            let snapshot = object_field(&iso, "snapshot");

            match object_field(&snapshot, "maxMinutes") {
                Value::Number(n) => assert_eq!(n.as_f64(), Some(30.0)),
                other => panic!("unexpected maxMinutes: {other}"),
            }
            let metadata = object_field(&snapshot, "metadata");
            match object_field(&metadata, "reachedStopCount") {
                Value::Number(n) => assert_eq!(n.as_u64(), Some(2)),
                other => panic!("unexpected reachedStopCount: {other}"),
            }

            // no profile requested: the default profile's three weights
            match object_field(&iso, "weights") {
                Value::List(weights) => assert_eq!(weights.len(), 3),
                other => panic!("unexpected weights: {other}"),
            }
        });
    }

    #[test]
    fn compare_requires_two_origins() {
        run(async {
            let schema = schema(test_graph(), test_query_config());
            let response = schema
                .execute(
                    "{ compare(origins: [{latitude: 50.80, longitude: 4.35}]) \
                       { results { label } } }",
                )
                .await;
            assert_eq!(response.errors.len(), 1);
            assert!(response.errors[0].message.contains("two or more"));
        });
    }

    #[test]
    fn compare_returns_labeled_results_in_order() {
        run(async {
            let schema = schema(test_graph(), test_query_config());
            let response = schema
                .execute(
                    "{ compare(origins: [\
                       {label: \"home\", latitude: 50.80, longitude: 4.35}, \
                       {latitude: 50.81, longitude: 4.35}]) \
                       { results { label snapshot { score } } } }",
                )
                .await;
            assert!(response.errors.is_empty(), "{:?}", response.errors);

            let results = object_field(&object_field(&response.data, "compare"), "results");
            match results {
                Value::List(list) => {
                    assert_eq!(list.len(), 2);
                    assert_eq!(
                        object_field(&list[0], "label"),
                        Value::String("home".to_string())
                    );
                    assert_eq!(
                        object_field(&list[1], "label"),
                        Value::String("Untitled pin".to_string())
                    );
                }
                other => panic!("unexpected results: {other}"),
            }
        });
    }

    #[test]
    fn app_config_lists_the_catalogue() {
        run(async {
            let schema = schema(test_graph(), test_query_config());
            let response = schema
                .execute(
                    "{ appConfig { poiCategories travelOptions \
                       scoringProfiles { id } \
                       datasetStats { stops stopTimes routes pois } } }",
                )
                .await;
            assert!(response.errors.is_empty(), "{:?}", response.errors);

            let config = object_field(&response.data, "appConfig");
            match object_field(&config, "poiCategories") {
                Value::List(categories) => assert_eq!(categories.len(), 3),
                other => panic!("unexpected poiCategories: {other}"),
            }
            match object_field(&config, "scoringProfiles") {
                Value::List(profiles) => assert_eq!(profiles.len(), 3),
                other => panic!("unexpected scoringProfiles: {other}"),
            }
            let stats = object_field(&config, "datasetStats");
            match object_field(&stats, "stops") {
                Value::Number(n) => assert_eq!(n.as_u64(), Some(2)),
                other => panic!("unexpected stops: {other}"),
            }
        });
    }
}
