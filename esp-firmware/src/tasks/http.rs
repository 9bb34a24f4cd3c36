// HTTP Server Task - Serviert HTML und nimmt Farb-Requests an
use defmt::{info, warn};
use embassy_net::Stack;
use embassy_time::Duration;
use esp_core::{Reason, Status, parse_rgb_triple};
use picoserve::extract::Query;
use picoserve::response::{IntoResponse, Response, StatusCode};
use picoserve::{io::embedded_io_async, routing::get};

use crate::WebColorSender;
use crate::config::*;
use crate::web::{
    INDEX_HTML,
    protocol::{ColorQuery, status_body},
};

/// Antwort des Farb-Endpoints
/// Body ist immer das Status-Token (`OK:COLOR_SET` bzw. `ERROR:INVALID_FORMAT`)
enum ColorResponse {
    Accepted,
    InvalidFormat,
}

impl ColorResponse {
    fn status(&self) -> Status {
        match self {
            ColorResponse::Accepted => Status::ok(Reason::ColorSet),
            ColorResponse::InvalidFormat => Status::error(Reason::InvalidFormat),
        }
    }
}

impl IntoResponse for ColorResponse {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        let code = match self {
            ColorResponse::Accepted => StatusCode::OK,
            ColorResponse::InvalidFormat => StatusCode::new(400),
        };
        let body = status_body(self.status());

        Response::new(code, body.as_str())
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .write_to(connection, response_writer)
            .await
    }
}

/// HTTP Server Task - läuft parallel zu anderen Tasks
///
/// - Serviert index.html auf GET /
/// - Nimmt `GET /color?rgb=R,G,B` an und reicht das Triple an den Control-Loop weiter
///
/// **Task Pool:** `HTTP_TASK_COUNT` Instanzen, damit Seite und Request parallel laufen.
#[embassy_executor::task(pool_size = HTTP_TASK_COUNT)]
pub async fn http_server_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    colors: WebColorSender,
) {
    info!("HTTP: Server task {} starting on port 80...", task_id);

    let app = picoserve::Router::new().route("/", get(serve_html)).route(
        "/color",
        get(move |Query(query): Query<ColorQuery>| async move {
            set_color(query, colors).await
        }),
    );

    // Server-Konfiguration
    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    // HTTP-Buffer für Requests/Responses
    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];

    // TCP-Buffers für Socket
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    let _ = server
        .listen_and_serve(task_id, *stack, 80, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task {} ended", task_id);
}

/// Serviert die HTML-Hauptseite
async fn serve_html() -> impl IntoResponse {
    Response::new(StatusCode::OK, INDEX_HTML)
        .with_header("Content-Type", "text/html; charset=utf-8")
}

/// Validiert `rgb` und übergibt das Triple an den Control-Loop
async fn set_color(query: ColorQuery, colors: WebColorSender) -> ColorResponse {
    let Some(raw) = query.rgb else {
        warn!("HTTP: /color without rgb parameter");
        return ColorResponse::InvalidFormat;
    };

    match parse_rgb_triple(raw.as_str()) {
        Ok(rgb) => {
            info!("HTTP: Color request {},{},{}", rgb[0], rgb[1], rgb[2]);
            colors.send(rgb).await;
            ColorResponse::Accepted
        }
        Err(e) => {
            warn!("HTTP: Rejected rgb '{}': {}", raw.as_str(), e);
            ColorResponse::InvalidFormat
        }
    }
}
