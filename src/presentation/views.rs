// HTML fragments and page shells
use crate::domain::dashboard::{Details, Gauge, Overview};
use crate::domain::projection::RoomFilter;
use crate::domain::reading::Reading;
use crate::domain::severity::Severity;
use crate::infrastructure::config::DisplaySettings;
use crate::presentation::view_controller::ViewUpdate;
use std::fmt::Write;

pub const LOAD_ERROR: &str = "Failed to load data. Please try again later.";

const MISSING: &str = "–";

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn metric(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| MISSING.to_string())
}

pub fn details_href(room: &str) -> String {
    format!("/details?room={}", urlencoding::encode(room))
}

pub fn gauge_card(gauge: &Gauge) -> String {
    format!(
        r#"<div class="card fade-in">
  <a href="{href}" class="card-link">
    <div class="gauge-container">
      <div class="gauge"></div>
      <div class="needle" style="transform: rotate({rotation}deg);"></div>
      <div class="gauge-center">
        <div class="gauge-label">{room}</div>
        <div class="gauge-value" style="color: {color}">{aqi} AQI</div>
        <div class="gauge-subvalue">{temperature} °C</div>
      </div>
    </div>
  </a>
</div>
"#,
        href = escape_html(&details_href(&gauge.room)),
        rotation = gauge.severity.rotation(),
        room = escape_html(&gauge.room),
        color = gauge.severity.color,
        aqi = gauge.aqi,
        temperature = metric(gauge.temperature),
    )
}

pub fn room_cards(overview: &Overview) -> String {
    overview.gauges.iter().map(gauge_card).collect()
}

pub fn room_selector(details: &Details) -> String {
    let mut html = String::from(
        r#"<select id="roomSelect" onchange="window.location.search = '?room=' + encodeURIComponent(this.value)">"#,
    );
    let selected = |is: bool| if is { " selected" } else { "" };

    let _ = write!(
        html,
        r#"<option value="{}"{}>All Rooms</option>"#,
        RoomFilter::ALL,
        selected(details.filter == RoomFilter::All)
    );
    for room in &details.rooms {
        let is_selected = matches!(&details.filter, RoomFilter::Room(r) if r == room);
        let room = escape_html(room);
        let _ = write!(
            html,
            r#"<option value="{room}"{}>{room}</option>"#,
            selected(is_selected)
        );
    }
    // A requested room without readings stays listed and selected.
    if let RoomFilter::Room(requested) = &details.filter {
        if !details.rooms.contains(requested) {
            let room = escape_html(requested);
            let _ = write!(html, r#"<option value="{room}" selected>{room}</option>"#);
        }
    }
    html.push_str("</select>");
    html
}

fn table_row(reading: &Reading, time_format: &str) -> String {
    format!(
        r#"<tr>
  <td>{time}</td>
  <td>{room}</td>
  <td style="color: {color}">{aqi}</td>
  <td>{temperature}</td>
  <td>{co2}</td>
  <td>{humidity}</td>
  <td>{tvoc}</td>
</tr>
"#,
        time = reading.timestamp.format(time_format),
        room = escape_html(&reading.room),
        color = Severity::from_aqi(reading.aqi).color,
        aqi = reading.aqi,
        temperature = metric(reading.temperature),
        co2 = metric(reading.co2),
        humidity = metric(reading.humidity),
        tvoc = metric(reading.tvoc),
    )
}

pub fn data_table(rows: &[Reading], time_format: &str) -> String {
    let body: String = rows.iter().map(|r| table_row(r, time_format)).collect();
    format!(
        r#"<div class="chart-container">
  <div class="table-responsive">
    <table>
      <thead>
        <tr>
          <th>Time</th>
          <th>Room</th>
          <th>AQI</th>
          <th>Temp (°C)</th>
          <th>CO₂ (ppm)</th>
          <th>Humidity (%)</th>
          <th>TVOC (ppb)</th>
        </tr>
      </thead>
      <tbody>
{body}      </tbody>
    </table>
  </div>
</div>
"#
    )
}

pub fn error_message(message: &str) -> String {
    format!(
        r#"<div class="error-message" style="color: var(--danger); padding: 1rem; text-align: center;">{}</div>"#,
        escape_html(message)
    )
}

const STYLE: &str = r#"
:root { --primary: #3f51b5; --danger: #f44336; --bg: #f5f7fb; --card: #ffffff; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg); color: #263238; }
header { background: var(--primary); color: #fff; padding: 1rem 2rem; display: flex; gap: 2rem; align-items: center; }
header a { color: #fff; text-decoration: none; opacity: .8; }
header a.active { opacity: 1; font-weight: 600; }
main { padding: 2rem; max-width: 1200px; margin: 0 auto; }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1.5rem; }
.card { background: var(--card); border-radius: 12px; box-shadow: 0 2px 8px rgba(0,0,0,.08); padding: 1rem; }
.card-link { color: inherit; text-decoration: none; }
.gauge-container { position: relative; height: 150px; }
.gauge { width: 200px; height: 100px; margin: 0 auto; border-radius: 100px 100px 0 0;
  background: conic-gradient(from 270deg at 50% 100%, #4caf50 0 36deg, #ffeb3b 36deg 72deg, #ff9800 72deg 108deg, #f44336 108deg 144deg, #9c27b0 144deg 180deg); }
.needle { position: absolute; left: calc(50% - 90px); top: 97px; width: 90px; height: 4px; background: #263238; transform-origin: right center; }
.gauge-center { text-align: center; margin-top: .5rem; }
.gauge-label { font-weight: 600; }
.gauge-value { font-size: 1.4rem; font-weight: 700; }
.chart-container { background: var(--card); border-radius: 12px; padding: 1rem; margin-top: 2rem; box-shadow: 0 2px 8px rgba(0,0,0,.08); }
.table-responsive { overflow-x: auto; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: .5rem; border-bottom: 1px solid #eceff1; text-align: left; }
.fade-in { animation: fade .4s ease-in; }
@keyframes fade { from { opacity: 0; } to { opacity: 1; } }
"#;

/// Applies view updates pushed over the event stream. Charts are keyed by slot
/// and destroyed before being replaced.
const PAGE_SCRIPT: &str = r#"
const charts = {};
const slots = { overview: 'overviewChart', details: 'detailsChart' };
const fragments = { cards: 'roomCards', selector: 'roomSelectContainer', table: 'dataTableContainer' };

function mountChart(update) {
  if (charts[update.slot]) {
    charts[update.slot].destroy();
    delete charts[update.slot];
  }
  const canvas = document.getElementById(slots[update.slot]);
  if (!canvas) return;
  const tooltip = update.config.options.plugins.tooltip || {};
  const suffix = tooltip.valueSuffix || '';
  tooltip.callbacks = {
    label: (context) => `${context.dataset.label || ''}: ${context.parsed.y}${suffix}`
  };
  update.config.options.plugins.tooltip = tooltip;
  charts[update.slot] = new Chart(canvas, update.config);
}

function applyUpdate(update) {
  for (const [key, id] of Object.entries(fragments)) {
    const element = document.getElementById(id);
    if (element && update[key] != null) element.innerHTML = update[key];
  }
  update.charts.forEach(mountChart);
}

const initial = JSON.parse(document.getElementById('initialCharts').textContent);
initial.forEach(mountChart);

const events = new EventSource(EVENTS_URL);
events.addEventListener('refresh', (event) => applyUpdate(JSON.parse(event.data)));

window.addEventListener('beforeunload', () => {
  events.close();
  Object.values(charts).forEach((chart) => chart.destroy());
});
"#;

/// Escape a JSON document for inclusion inside a `<script>` element.
fn script_json(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

/// Event stream URL for a rendered page. `chart` names the mounted chart the
/// stream takes over.
fn events_url(path: &str, filter: Option<&RoomFilter>, update: &ViewUpdate) -> String {
    let mut params: Vec<String> = Vec::new();
    if let Some(filter) = filter {
        params.push(format!("room={}", urlencoding::encode(filter.as_str())));
    }
    if let Some(chart) = update.charts.first() {
        params.push(format!("chart={}", chart.handle));
    }

    if params.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, params.join("&"))
    }
}

fn scripts(display: &DisplaySettings, update: &ViewUpdate, events_url: &str) -> String {
    format!(
        r#"<script src="{chart_js}"></script>
<script src="{adapter}"></script>
<script type="application/json" id="initialCharts">{charts}</script>
<script>
const EVENTS_URL = {events_url};
{script}</script>
"#,
        chart_js = escape_html(&display.chart_js_url),
        adapter = escape_html(&display.chart_adapter_url),
        charts = script_json(&update.charts),
        events_url = script_json(&events_url),
        script = PAGE_SCRIPT,
    )
}

fn layout(title: &str, active: &str, main: &str, scripts: &str) -> String {
    let nav_class = |page: &str| if page == active { r#" class="active""# } else { "" };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<header>
  <h1>Air Quality</h1>
  <nav><a href="/"{overview_class}>Dashboard</a> <a href="/details"{details_class}>Details</a></nav>
</header>
<main>
{main}
</main>
{scripts}</body>
</html>
"#,
        title = escape_html(title),
        style = STYLE,
        overview_class = nav_class("overview"),
        details_class = nav_class("details"),
    )
}

/// Overview page. `None` renders the load failure in place of the room cards.
pub fn overview_page(display: &DisplaySettings, update: Option<&ViewUpdate>) -> String {
    let cards = match update {
        Some(update) => update.cards.clone().unwrap_or_default(),
        None => error_message(LOAD_ERROR),
    };
    let main = format!(
        r#"<section>
  <h2>Rooms</h2>
  <div id="roomCards" class="cards">{cards}</div>
</section>
<section class="chart-container">
  <h2>AQI Overview</h2>
  <canvas id="overviewChart"></canvas>
</section>"#
    );
    let scripts = update
        .map(|u| scripts(display, u, &events_url("/events/overview", None, u)))
        .unwrap_or_default();

    layout("Air Quality Dashboard", "overview", &main, &scripts)
}

/// Details page. `None` renders the load failure in place of the data table.
pub fn details_page(
    display: &DisplaySettings,
    filter: &RoomFilter,
    update: Option<&ViewUpdate>,
) -> String {
    let (selector, table) = match update {
        Some(update) => (
            update.selector.clone().unwrap_or_default(),
            update.table.clone().unwrap_or_default(),
        ),
        None => (String::new(), error_message(LOAD_ERROR)),
    };
    let main = format!(
        r#"<section>
  <label for="roomSelect">Room</label>
  <div id="roomSelectContainer">{selector}</div>
</section>
<section class="chart-container">
  <canvas id="detailsChart"></canvas>
</section>
<section id="dataTableContainer">{table}</section>"#
    );
    let scripts = update
        .map(|u| scripts(display, u, &events_url("/events/details", Some(filter), u)))
        .unwrap_or_default();

    layout("Air Quality Details", "details", &main, &scripts)
}
