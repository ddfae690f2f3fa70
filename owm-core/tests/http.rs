use std::{
    io::{Read, Write},
    net::TcpListener,
    thread,
};

use owm_core::{Config, Error, Location, OpenWeatherMap, Result, WeatherResponse};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const LONDON: &str = include_str!("fixtures/london.json");

/// Run a lookup on a blocking thread; the blocking client must not live on the async runtime.
async fn lookup<F>(server: &MockServer, config: Config, f: F) -> Result<WeatherResponse>
where
    F: FnOnce(&OpenWeatherMap) -> Result<WeatherResponse> + Send + 'static,
{
    let base = server.uri();
    tokio::task::spawn_blocking(move || {
        let client = OpenWeatherMap::new(config)?.with_base_url(base);
        f(&client)
    })
    .await
    .expect("blocking task panicked")
}

async fn received_queries(server: &MockServer) -> Vec<Vec<(String, String)>> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .iter()
        .map(|req| {
            req.url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .collect()
}

fn pair(k: &str, v: &str) -> (String, String) {
    (k.to_string(), v.to_string())
}

#[tokio::test]
async fn city_lookup_decodes_every_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London,uk"))
        .and(query_param("APPID", "KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LONDON))
        .expect(1)
        .mount(&server)
        .await;

    let w = lookup(&server, Config::new("KEY"), |c| c.current_weather_from_city("London,uk"))
        .await
        .expect("lookup should succeed");

    assert_eq!(w.coord.lon, -0.1257);
    assert_eq!(w.coord.lat, 51.5085);
    assert_eq!(w.weather.len(), 2);
    assert_eq!(w.weather[0].id, 500);
    assert_eq!(w.weather[0].main, "Rain");
    assert_eq!(w.weather[0].description, "light rain");
    assert_eq!(w.weather[0].icon, "10d");
    assert_eq!(w.weather[1].main, "Mist");
    assert_eq!(w.base, "stations");
    assert_eq!(w.main.temp, 11.46);
    assert_eq!(w.main.feels_like, 10.93);
    assert_eq!(w.main.temp_min, 10.18);
    assert_eq!(w.main.temp_max, 12.33);
    assert_eq!(w.main.pressure, 1004);
    assert_eq!(w.main.humidity, 88);
    assert_eq!(w.main.sea_level, Some(1004));
    assert_eq!(w.main.grnd_level, Some(1000));
    assert_eq!(w.visibility, 7000);
    assert_eq!(w.wind.speed, 5.66);
    assert_eq!(w.wind.deg, 230.0);
    assert_eq!(w.wind.gust, Some(9.77));
    assert_eq!(w.rain.and_then(|r| r.one_hour), Some(0.42));
    assert_eq!(w.clouds.all, 100);
    assert_eq!(w.dt, 1760611200);
    assert_eq!(w.sys.kind, 2);
    assert_eq!(w.sys.id, 2075535);
    assert_eq!(w.sys.message, 0.0041);
    assert_eq!(w.sys.country, "GB");
    assert_eq!(w.sys.sunrise, 1760595693);
    assert_eq!(w.sys.sunset, 1760633415);
    assert_eq!(w.timezone, 3600);
    assert_eq!(w.id, 2643743);
    assert_eq!(w.name, "London");
    assert_eq!(w.cod, 200);
}

#[tokio::test]
async fn each_lookup_mode_sends_its_query_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LONDON))
        .expect(4)
        .mount(&server)
        .await;

    let config = Config::new("KEY").with_units("metric");
    lookup(&server, config.clone(), |c| c.current_weather_from_city("London")).await.unwrap();
    lookup(&server, config.clone(), |c| c.current_weather_from_coordinates(51.5, -0.12))
        .await
        .unwrap();
    lookup(&server, config.clone(), |c| c.current_weather_from_zip("94040,us")).await.unwrap();
    lookup(&server, config, |c| c.current_weather_from_city_id(2643743)).await.unwrap();

    let units = pair("units", "metric");
    let key = pair("APPID", "KEY");
    assert_eq!(
        received_queries(&server).await,
        vec![
            vec![pair("q", "London"), units.clone(), key.clone()],
            vec![pair("lat", "51.500000"), pair("lon", "-0.120000"), units.clone(), key.clone()],
            vec![pair("zip", "94040,us"), units.clone(), key.clone()],
            vec![pair("id", "2643743"), units, key],
        ]
    );
}

#[tokio::test]
async fn units_omitted_when_not_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LONDON))
        .mount(&server)
        .await;

    lookup(&server, Config::new("KEY"), |c| c.current_weather_from_city_id(1)).await.unwrap();
    lookup(&server, Config::new("KEY").with_units(""), |c| c.current_weather_from_city_id(1))
        .await
        .unwrap();

    for query in received_queries(&server).await {
        assert!(query.iter().all(|(k, _)| k != "units"), "unexpected units in {query:?}");
    }
}

#[tokio::test]
async fn empty_api_key_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LONDON))
        .expect(0)
        .mount(&server)
        .await;

    let err = lookup(&server, Config::default().with_units("metric"), |c| {
        c.current_weather(&Location::City("London".into()))
    })
    .await
    .unwrap_err();

    assert!(matches!(err, Error::MissingApiKey));
    assert!(received_queries(&server).await.is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&LONDON[..LONDON.len() / 2]))
        .mount(&server)
        .await;

    let err = lookup(&server, Config::new("KEY"), |c| c.current_weather_from_city("London"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn schema_mismatch_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"weather": "sunny"}"#))
        .mount(&server)
        .await;

    let err = lookup(&server, Config::new("KEY"), |c| c.current_weather_from_city("London"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn provider_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"cod":401, "message": "Invalid API key."}"#),
        )
        .mount(&server)
        .await;

    let err = lookup(&server, Config::new("BAD"), |c| c.current_weather_from_city("London"))
        .await
        .unwrap_err();

    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API key.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Bind and drop a listener so the port is known to be closed.
    let uri = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        format!("http://{}", listener.local_addr().expect("local addr"))
    };

    let err = tokio::task::spawn_blocking(move || {
        let client = OpenWeatherMap::new(Config::new("KEY"))?.with_base_url(uri);
        client.current_weather_from_city("London")
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}

#[test]
fn truncated_body_is_an_io_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));

    // Promise 5000 bytes, send a few, then hang up.
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 5000\r\n\r\n{\"coord\":")
            .expect("write response");
    });

    let client = OpenWeatherMap::new(Config::new("KEY"))
        .expect("client")
        .with_base_url(base);
    let err = client.current_weather_from_city("London").unwrap_err();
    server.join().expect("server thread");

    assert!(matches!(err, Error::Io(_)), "got {err:?}");
}

#[tokio::test]
async fn forecast_hits_forecast_endpoint() {
    let server = MockServer::start().await;
    let body = r#"{
        "cnt": 1,
        "list": [{
            "dt": 1760616000,
            "main": {"temp": 12.1, "feels_like": 11.5, "pressure": 1005, "humidity": 85},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "clouds": {"all": 96},
            "wind": {"speed": 5.1, "deg": 224},
            "dt_txt": "2025-10-16 12:00:00"
        }],
        "city": {
            "id": 2643743,
            "name": "London",
            "coord": {"lat": 51.5085, "lon": -0.1257},
            "country": "GB"
        }
    }"#;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let base = server.uri();
    let forecast = tokio::task::spawn_blocking(move || {
        let client = OpenWeatherMap::new(Config::new("KEY"))?.with_base_url(base);
        client.forecast(&Location::City("London".into()))
    })
    .await
    .unwrap()
    .expect("forecast should succeed");

    assert_eq!(forecast.city.name, "London");
    assert_eq!(forecast.list.len(), 1);
    assert_eq!(forecast.list[0].main.temp, 12.1);
    assert_eq!(forecast.list[0].weather[0].description, "light rain");
}
