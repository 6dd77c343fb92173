//! Integration tests for the OpenWeather provider and lookup service using wiremock.

use std::sync::Arc;

use weather_core::{LookupError, OpenWeatherConfig, OpenWeatherProvider, Units, WeatherService};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "SECRET-KEY-123";

fn service_for(server: &MockServer) -> WeatherService {
    let config = OpenWeatherConfig {
        base_url: format!("{}/data/2.5", server.uri()),
        ..OpenWeatherConfig::default()
    };
    let provider = OpenWeatherProvider::new(API_KEY.to_string(), &config).unwrap();
    WeatherService::new(Arc::new(provider))
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "main": { "temp": 15, "feels_like": 14.2, "temp_min": 13.9, "temp_max": 16.1, "humidity": 81 },
        "wind": { "speed": 5.1 },
        "sys": { "country": "GB", "sunrise": 1714537251, "sunset": 1714591552 },
        "name": "London"
    })
}

/// Entries every 3 hours from 2024-05-01 00:00 through `last_day` at `last_hour`.
fn forecast_body(last_day: u32, last_hour: u32) -> serde_json::Value {
    let mut list = Vec::new();
    for day in 1..=last_day {
        for hour in (0..24).step_by(3) {
            if day == last_day && hour > last_hour {
                break;
            }
            list.push(serde_json::json!({
                "dt_txt": format!("2024-05-{day:02} {hour:02}:00:00"),
                "main": { "temp": f64::from(day * 100 + hour), "feels_like": 1.5 },
                "weather": [{ "description": "clear sky", "icon": "01d" }]
            }));
        }
    }
    serde_json::json!({ "cod": "200", "cnt": list.len(), "list": list })
}

#[tokio::test]
async fn current_weather_sends_credentials_and_units() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", Units::Metric.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;

    let cc = service_for(&server).get_current_conditions(Some("London")).await.unwrap();

    assert_eq!(cc.city, "London");
    assert_eq!(cc.country, "GB");
    assert_eq!(cc.temp, 15.0);
    assert_eq!(cc.humidity, 81);
    assert_eq!(cc.description, "light rain");
    assert_eq!(cc.sunset, 1714591552);
}

#[tokio::test]
async fn three_day_forecast_yields_three_middays() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(3, 21)))
        .mount(&server)
        .await;

    let daily = service_for(&server).get_daily_forecast(Some("Berlin")).await.unwrap();

    let temps: Vec<f64> = daily.iter().map(|e| e.temp).collect();
    assert_eq!(temps, [112.0, 212.0, 312.0]);

    let json = serde_json::to_value(&daily).unwrap();
    assert_eq!(json[0]["date"], "2024-05-01 12:00:00");
}

#[tokio::test]
async fn partial_last_day_is_omitted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(3, 9)))
        .mount(&server)
        .await;

    let daily = service_for(&server).get_daily_forecast(Some("Berlin")).await.unwrap();
    assert_eq!(daily.len(), 2);
}

#[tokio::test]
async fn city_not_found_is_upstream_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let svc = service_for(&server);

    let err = svc.get_current_conditions(Some("Atlantis")).await.unwrap_err();
    assert!(matches!(err, LookupError::Upstream(_)));

    let err = svc.get_daily_forecast(Some("Atlantis")).await.unwrap_err();
    let LookupError::Upstream(cause) = err else {
        panic!("expected upstream failure");
    };
    assert!(cause.to_string().contains("404"));
}

#[tokio::test]
async fn malformed_current_payload_is_upstream_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = service_for(&server).get_current_conditions(Some("London")).await.unwrap_err();
    let LookupError::Upstream(cause) = err else {
        panic!("expected upstream failure");
    };
    assert!(format!("{cause:#}").contains("Failed to parse OpenWeather weather JSON"));
}

#[tokio::test]
async fn forecast_entry_without_condition_is_upstream_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "list": [
                {
                    "dt_txt": "2024-05-01 09:00:00",
                    "main": { "temp": 1.0, "feels_like": 0.5 },
                    "weather": [{ "description": "mist", "icon": "50d" }]
                },
                {
                    "dt_txt": "2024-05-01 12:00:00",
                    "main": { "temp": 2.0, "feels_like": 1.5 },
                    "weather": []
                }
            ]
        })))
        .mount(&server)
        .await;

    let err = service_for(&server).get_daily_forecast(Some("London")).await.unwrap_err();
    let LookupError::Upstream(cause) = err else {
        panic!("expected upstream failure");
    };
    assert!(format!("{cause:#}").contains("empty `weather` array"));
}

#[tokio::test]
async fn empty_weather_array_is_upstream_failure() {
    let server = MockServer::start().await;

    let mut body = current_body();
    body["weather"] = serde_json::json!([]);

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = service_for(&server).get_current_conditions(Some("London")).await.unwrap_err();
    assert!(matches!(err, LookupError::Upstream(_)));
}

#[tokio::test]
async fn blank_city_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(0)
        .mount(&server)
        .await;

    let svc = service_for(&server);
    assert!(svc.get_current_conditions(Some(" ")).await.unwrap_err().is_invalid_input());
    assert!(svc.get_daily_forecast(None).await.unwrap_err().is_invalid_input());
}

#[tokio::test]
async fn repeated_lookups_are_independent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(2)
        .mount(&server)
        .await;

    let svc = service_for(&server);
    let first = svc.get_current_conditions(Some("London")).await.unwrap();
    let second = svc.get_current_conditions(Some("London")).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn repeated_forecast_lookups_are_independent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(5, 21)))
        .expect(2)
        .mount(&server)
        .await;

    let svc = service_for(&server);
    let first = svc.get_daily_forecast(Some("Berlin")).await.unwrap();
    let second = svc.get_daily_forecast(Some("Berlin")).await.unwrap();

    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
}

#[tokio::test]
async fn unreachable_upstream_is_upstream_failure() {
    let config = OpenWeatherConfig {
        base_url: "http://127.0.0.1:1/data/2.5".to_string(),
        timeout_secs: Some(5),
        ..OpenWeatherConfig::default()
    };
    let provider = OpenWeatherProvider::new(API_KEY.to_string(), &config).unwrap();
    let svc = WeatherService::new(Arc::new(provider));

    let err = svc.get_current_conditions(Some("London")).await.unwrap_err();
    let LookupError::Upstream(cause) = err else {
        panic!("expected upstream failure");
    };

    let logged = format!("{cause:?}");
    assert!(logged.contains("Failed to send request to OpenWeather (weather)"));
    assert!(!logged.contains(API_KEY), "credential in error chain: {logged}");
    assert!(!logged.contains("appid"), "request URL in error chain: {logged}");
}
