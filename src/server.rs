//! Simple HTTP server for the interactive dashboard.
//!
//! Serves an HTML page with the comparison, quantity and migration forms
//! and a small JSON API behind it. Connections are handled one at a time.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::compare::{self, ComparisonMode, QuantityRequest, Selection};
use crate::data::Datasets;
use crate::error::{AppError, Result, SelectionError};
use crate::migrate::{self, MigrationForm, WorkloadMix};
use crate::model::ProcessorKind;
use crate::prefs::PrefsStore;
use crate::report::{ComparisonReport, MigrationReport, QuantityReport, EXPORT_FILE_NAME};
use crate::selectors;

type Query = HashMap<String, String>;

/// Run the HTTP server on the specified port.
pub fn serve(port: u16, data: &Datasets, prefs: &PrefsStore) -> Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr)?;

    println!("=== Processor Comparison Dashboard ===");
    println!("Server running at: http://{}", addr);
    println!("Press Ctrl+C to stop\n");
    info!(%addr, prefs = %prefs.path().display(), "dashboard listening");

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => handle_connection(stream, data, prefs),
            Err(e) => warn!(error = %e, "connection error"),
        }
    }
    Ok(())
}

fn handle_connection(mut stream: TcpStream, data: &Datasets, prefs: &PrefsStore) {
    let mut buffer = [0; 4096];
    let n = match stream.read(&mut buffer) {
        Ok(n) => n,
        Err(e) => {
            debug!(error = %e, "read failed");
            return;
        }
    };

    let request = String::from_utf8_lossy(&buffer[..n]);
    let first_line = request.lines().next().unwrap_or("");
    let response = match parse_request_line(first_line) {
        Some((path, query)) => route(&path, &query, data, prefs),
        None => Response::text(400, "Bad Request"),
    };
    debug!(request = first_line, status = response.status, "handled");

    let _ = stream.write_all(response.to_http().as_bytes());
    let _ = stream.flush();
}

// ============================================================================
// Request Parsing
// ============================================================================

/// Path and query of a `GET` request line.
fn parse_request_line(line: &str) -> Option<(String, Query)> {
    let mut parts = line.split_whitespace();
    if parts.next()? != "GET" {
        return None;
    }
    let target = parts.next()?;
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, parse_query(query)),
        None => (target, Query::new()),
    };
    Some((percent_decode(path), query))
}

fn parse_query(query: &str) -> Query {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (percent_decode(k), percent_decode(v)))
        .collect()
}

/// Decode `%XX` escapes and `+` as produced by `URLSearchParams`.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(b) => {
                        out.push(b);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn param(query: &Query, key: &str) -> Option<String> {
    query.get(key).cloned()
}

fn param_or_empty(query: &Query, key: &str) -> String {
    query.get(key).cloned().unwrap_or_default()
}

fn param_u32(query: &Query, key: &str) -> u32 {
    query.get(key).and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug)]
struct Response {
    status: u16,
    content_type: &'static str,
    body: String,
    attachment: Option<&'static str>,
}

impl Response {
    fn text(status: u16, body: &str) -> Self {
        Self { status, content_type: "text/plain; charset=utf-8", body: body.to_string(), attachment: None }
    }

    fn html(body: &str) -> Self {
        Self { status: 200, content_type: "text/html; charset=utf-8", body: body.to_string(), attachment: None }
    }

    fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status: 200, content_type: "application/json", body, attachment: None },
            Err(e) => Self::error(&AppError::from(e)),
        }
    }

    /// Validation failures are the client's; anything else is ours.
    fn error(e: &AppError) -> Self {
        let status = if e.is_validation() { 400 } else { 500 };
        if status == 500 {
            warn!(error = %e, "request failed");
        }
        Self {
            status,
            content_type: "application/json",
            body: json!({ "error": e.to_string() }).to_string(),
            attachment: None,
        }
    }

    fn to_http(&self) -> String {
        let status_text = match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => "Unknown",
        };
        let disposition = self
            .attachment
            .map(|name| format!("Content-Disposition: attachment; filename=\"{}\"\r\n", name))
            .unwrap_or_default();

        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n{}Access-Control-Allow-Origin: *\r\nConnection: close\r\n\r\n{}",
            self.status,
            status_text,
            self.content_type,
            self.body.len(),
            disposition,
            self.body
        )
    }
}

fn respond<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(value) => Response::json(&value),
        Err(e) => Response::error(&e),
    }
}

// ============================================================================
// Routes
// ============================================================================

fn route(path: &str, query: &Query, data: &Datasets, prefs: &PrefsStore) -> Response {
    match path {
        "/" | "/index.html" => Response::html(DASHBOARD_HTML),
        "/api/selectors" => Response::json(&selectors::selector_set(
            &data.processors,
            &data.workloads,
            prefs.preferred_workload(),
        )),
        "/api/compare" => respond(compare_report(query, data, prefs)),
        "/api/export" => match compare_report(query, data, prefs) {
            Ok(report) => Response {
                attachment: Some(EXPORT_FILE_NAME),
                ..Response::text(200, &report.export_text())
            },
            Err(e) => Response::error(&e),
        },
        "/api/quantity" => respond(quantity_report(query, data)),
        "/api/migrate" => respond(migration_report(query, data)),
        _ => match path.strip_prefix("/api/workloads/") {
            Some(id) => match data.workloads.find(id) {
                Some(workload) => Response::json(workload),
                None => Response::error(&AppError::from(SelectionError::UnknownWorkload)),
            },
            None => Response::text(404, "Not Found"),
        },
    }
}

fn selection_from(query: &Query) -> Selection {
    Selection {
        mode: query.get("mode").and_then(|m| ComparisonMode::from_str(m)),
        power: param(query, "power"),
        intel: param(query, "intel"),
        mainframe: param(query, "mainframe"),
        workload: param(query, "workload"),
        quantity: Some(param_u32(query, "quantity")),
    }
}

fn compare_report(query: &Query, data: &Datasets, prefs: &PrefsStore) -> Result<ComparisonReport> {
    let result = compare::compare(data, &selection_from(query))?;
    if let Err(e) = prefs.save_workload(&result.workload.id) {
        warn!(error = %e, "could not save workload preference");
    }
    Ok(ComparisonReport::build(result))
}

fn quantity_report(query: &Query, data: &Datasets) -> Result<QuantityReport> {
    let kind = |key: &str| query.get(key).and_then(|s| ProcessorKind::from_str(s));
    let request = QuantityRequest {
        source_kind: kind("source_type"),
        source_id: param(query, "source"),
        target_kind: kind("target_type"),
        target_id: param(query, "target"),
        source_quantity: Some(param_u32(query, "quantity")),
        workload: param(query, "workload"),
    };
    Ok(QuantityReport::build(compare::quantity(data, &request)?))
}

fn migration_report(query: &Query, data: &Datasets) -> Result<MigrationReport> {
    let form = MigrationForm {
        source_mips: param_or_empty(query, "mips"),
        utilization: param_or_empty(query, "utilization"),
        workload: param_or_empty(query, "workload"),
        target: param_or_empty(query, "target"),
        mix: WorkloadMix {
            processor_intensive: param_u32(query, "pi"),
            tpc_c: param_u32(query, "tpcc"),
            commercial: param_u32(query, "commercial"),
            mixed: param_u32(query, "mixed"),
            business_intelligence: param_u32(query, "bi"),
        },
    };
    Ok(MigrationReport::build(migrate::size_form(&data.workloads, &form)?))
}

// ============================================================================
// Dashboard
// ============================================================================

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Processor Architecture Comparison</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        /* ============================================
           Design System
           ============================================ */
        :root {
            --bg-primary: #f4f6f9;
            --bg-card: #ffffff;
            --border-color: #dde3ea;
            --text-primary: #161b22;
            --text-muted: #5b6776;
            --power: rgb(15, 98, 254);
            --intel: rgb(0, 113, 197);
            --mainframe: rgb(102, 51, 153);
            --danger: #da1e28;
            --space-2: 8px;
            --space-3: 12px;
            --space-4: 16px;
            --space-5: 24px;
            --radius: 8px;
            --font-sans: 'Inter', -apple-system, BlinkMacSystemFont, sans-serif;
        }

        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: var(--font-sans); background: var(--bg-primary); color: var(--text-primary); line-height: 1.5; }
        header { padding: var(--space-5); background: var(--bg-card); border-bottom: 1px solid var(--border-color); }
        main { max-width: 1400px; margin: 0 auto; padding: var(--space-5); display: grid; gap: var(--space-5); }

        /* ============================================
           Cards, Forms, Tabs
           ============================================ */
        .card { background: var(--bg-card); border: 1px solid var(--border-color); border-radius: var(--radius); padding: var(--space-5); }
        .card h2 { font-size: 1.1rem; margin-bottom: var(--space-4); }
        .row { display: flex; flex-wrap: wrap; gap: var(--space-4); align-items: flex-end; }
        label { display: grid; gap: 4px; font-size: 0.85rem; color: var(--text-muted); }
        select, input { padding: 6px 8px; border: 1px solid var(--border-color); border-radius: 6px; min-width: 180px; }
        button { padding: 8px 16px; border: 0; border-radius: 6px; background: var(--power); color: #fff; cursor: pointer; }
        button.secondary { background: var(--text-muted); }
        .tabs { display: flex; gap: var(--space-2); margin-bottom: var(--space-4); }
        .tab { background: transparent; color: var(--text-primary); border: 1px solid var(--border-color); }
        .tab.active { background: var(--power); color: #fff; }
        .hidden { display: none !important; }

        /* ============================================
           Results
           ============================================ */
        .scores { display: grid; grid-template-columns: repeat(4, 1fr); gap: var(--space-3); }
        .score { border-left: 4px solid var(--power); padding: var(--space-3); background: var(--bg-primary); border-radius: 6px; }
        .score.intel { border-color: var(--intel); }
        .score.mainframe { border-color: var(--mainframe); }
        .score .value { font-size: 1.4rem; font-weight: 600; }
        .badge { display: inline-block; width: 22px; height: 22px; border-radius: 50%; color: #fff; text-align: center; font-size: 0.8rem; line-height: 22px; background: var(--power); }
        .badge.intel { background: var(--intel); }
        .badge.mainframe { background: var(--mainframe); }
        .bar { height: 10px; background: var(--border-color); border-radius: 5px; overflow: hidden; margin: 4px 0 8px; }
        .bar div { height: 100%; background: var(--power); }
        .bar .intel { background: var(--intel); }
        .bar .mainframe { background: var(--mainframe); }
        table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }
        td, th { padding: 6px 8px; border-bottom: 1px solid var(--border-color); text-align: left; }
        .charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(380px, 1fr)); gap: var(--space-4); }
        .chart-box { position: relative; height: 320px; }
        .mix-total { font-weight: 600; }
        .mix-total.invalid { color: var(--danger); }
        #error-banner { position: fixed; top: 16px; right: 16px; background: var(--danger); color: #fff; padding: 12px 16px; border-radius: 6px; box-shadow: 0 4px 12px rgba(0,0,0,0.2); }
    </style>
</head>
<body>
    <div id="error-banner" class="hidden"></div>
    <header><h1>Processor Architecture Comparison</h1></header>
    <main>
        <section class="card">
            <h2>Compare Processors</h2>
            <div class="tabs">
                <button class="tab active" data-mode="power-intel">POWER vs Intel</button>
                <button class="tab" data-mode="power-mainframe">POWER vs Mainframe</button>
                <button class="tab" data-mode="intel-mainframe">Intel vs Mainframe</button>
                <button class="tab" data-mode="all">All</button>
            </div>
            <div class="row">
                <label data-kind="power">POWER<select id="power"></select></label>
                <label data-kind="intel">Intel<select id="intel"></select></label>
                <label data-kind="mainframe" class="hidden">Mainframe<select id="mainframe"></select></label>
                <label>Workload<select id="workload"></select></label>
                <label>Quantity<input id="processor-quantity" type="number" min="1" value="1"></label>
                <button id="compare-btn">Compare</button>
                <button id="export-btn" class="secondary hidden">Export</button>
            </div>
            <p id="workload-info" style="margin-top: 12px; color: var(--text-muted)"></p>
        </section>

        <section id="compare-results" class="card hidden">
            <h2>Results</h2>
            <p id="summary"></p>
            <div id="scores" class="scores" style="margin: 16px 0"></div>
            <div id="metrics"></div>
            <div class="charts">
                <div class="chart-box"><canvas id="overview-chart"></canvas></div>
                <div class="chart-box" id="single-box"><canvas id="single-chart"></canvas></div>
                <div class="chart-box"><canvas id="multi-chart"></canvas></div>
            </div>
            <table id="details" style="margin-top: 16px"></table>
        </section>

        <section class="card">
            <h2>Processor Quantity Equivalence</h2>
            <div class="row">
                <label>Source type<select id="q-source-type"><option value="power">POWER</option><option value="intel">Intel</option><option value="mainframe">Mainframe</option></select></label>
                <label>Source<select id="q-source"></select></label>
                <label>Quantity<input id="q-quantity" type="number" min="1" value="1"></label>
                <label>Target type<select id="q-target-type"><option value="power">POWER</option><option value="intel" selected>Intel</option><option value="mainframe">Mainframe</option></select></label>
                <label>Target<select id="q-target"></select></label>
                <button id="quantity-btn">Calculate</button>
            </div>
            <div id="quantity-results" class="hidden" style="margin-top: 16px">
                <h3 id="q-headline"></h3>
                <p id="q-note" style="color: var(--text-muted)"></p>
                <div class="chart-box"><canvas id="quantity-chart"></canvas></div>
            </div>
        </section>

        <section class="card">
            <h2>Mainframe Migration Sizing</h2>
            <div class="row">
                <label>Mainframe MIPS<input id="m-mips" type="number" min="1"></label>
                <label>Utilization %<input id="m-util" type="number" min="1" max="100" value="80"></label>
                <label>Workload<select id="m-workload"></select></label>
                <label>Target<select id="m-target"><option value="both">Both</option><option value="power">IBM POWER</option><option value="intel">Intel x86</option></select></label>
                <button id="migrate-btn">Calculate</button>
            </div>
            <div id="mix" class="row hidden" style="margin-top: 12px">
                <label>Processor intensive %<input class="mix" id="mix-pi" type="number" min="0" max="100" value="0"></label>
                <label>TPC-C %<input class="mix" id="mix-tpcc" type="number" min="0" max="100" value="0"></label>
                <label>Commercial %<input class="mix" id="mix-commercial" type="number" min="0" max="100" value="0"></label>
                <label>Mixed %<input class="mix" id="mix-mixed" type="number" min="0" max="100" value="0"></label>
                <label>BI %<input class="mix" id="mix-bi" type="number" min="0" max="100" value="0"></label>
                <span id="mix-total" class="mix-total invalid">Total: 0%</span>
            </div>
            <div id="migrate-results" class="hidden" style="margin-top: 16px">
                <p id="m-summary"></p>
                <p><strong>Total required transactions per minute (tpm):</strong> <span id="m-tpm"></span></p>
                <div class="row" id="m-platforms" style="align-items: flex-start"></div>
                <div class="chart-box"><canvas id="migrate-chart"></canvas></div>
            </div>
        </section>
    </main>

    <script>
        const charts = {};
        let selectorData = null;
        let currentMode = 'power-intel';
        let bannerTimer = null;

        function showError(message) {
            const banner = document.getElementById('error-banner');
            banner.textContent = message;
            banner.classList.remove('hidden');
            clearTimeout(bannerTimer);
            bannerTimer = setTimeout(() => banner.classList.add('hidden'), 5000);
        }

        async function getJson(url) {
            const res = await fetch(url);
            const body = await res.json();
            if (!res.ok) throw new Error(body.error || res.statusText);
            return body;
        }

        function drawChart(id, config) {
            if (charts[id]) charts[id].destroy();
            charts[id] = config ? new Chart(document.getElementById(id), config) : null;
        }

        function fillOptions(select, groups, placeholder) {
            select.innerHTML = '';
            const first = document.createElement('option');
            first.value = '';
            first.textContent = placeholder;
            select.appendChild(first);
            groups.forEach(g => {
                const og = document.createElement('optgroup');
                og.label = g.label;
                g.options.forEach(o => {
                    const opt = document.createElement('option');
                    opt.value = o.value;
                    opt.textContent = o.text;
                    og.appendChild(opt);
                });
                select.appendChild(og);
            });
        }

        function fillFlat(select, options, placeholder) {
            fillOptions(select, [{ label: '', options }], placeholder);
            const og = select.querySelector('optgroup');
            og.replaceWith(...og.children);
        }

        function selectorFor(kind) {
            return selectorData.processors.find(s => s.kind === kind);
        }

        function fillQuantity(side) {
            const kind = document.getElementById(`q-${side}-type`).value;
            const s = selectorFor(kind);
            fillOptions(document.getElementById(`q-${side}`), s.groups, s.placeholder);
        }

        async function loadSelectors() {
            selectorData = await getJson('/api/selectors');
            ['power', 'intel', 'mainframe'].forEach(kind => {
                const s = selectorFor(kind);
                fillOptions(document.getElementById(kind), s.groups, s.placeholder);
            });
            fillFlat(document.getElementById('workload'), selectorData.workloads, 'Select Workload Type');
            fillFlat(document.getElementById('m-workload'), selectorData.migration_workloads, 'Select Workload Type');
            if (selectorData.preferred_workload) {
                document.getElementById('workload').value = selectorData.preferred_workload;
                showWorkloadInfo(selectorData.preferred_workload);
            }
            fillQuantity('source');
            fillQuantity('target');
        }

        async function showWorkloadInfo(id) {
            const info = document.getElementById('workload-info');
            if (!id) { info.textContent = ''; return; }
            try {
                const w = await getJson('/api/workloads/' + encodeURIComponent(id));
                info.textContent = `${w.name}: ${w.description} Examples: ${w.examples.join(', ')}.`;
            } catch (e) { showError(e.message); }
        }

        function setMode(mode) {
            currentMode = mode;
            document.querySelectorAll('.tab').forEach(t => t.classList.toggle('active', t.dataset.mode === mode));
            const visible = selectorData.modes.find(m => m.id === mode).visible;
            document.querySelectorAll('label[data-kind]').forEach(l =>
                l.classList.toggle('hidden', !visible.includes(l.dataset.kind)));
        }

        function compareParams() {
            return new URLSearchParams({
                mode: currentMode,
                power: document.getElementById('power').value,
                intel: document.getElementById('intel').value,
                mainframe: document.getElementById('mainframe').value,
                workload: document.getElementById('workload').value,
                quantity: document.getElementById('processor-quantity').value,
            });
        }

        async function runCompare() {
            try {
                renderComparison(await getJson('/api/compare?' + compareParams()));
            } catch (e) { showError(e.message); }
        }

        function renderComparison(r) {
            document.getElementById('compare-results').classList.remove('hidden');
            document.getElementById('export-btn').classList.remove('hidden');
            document.getElementById('summary').textContent = r.summary;
            document.getElementById('scores').innerHTML = r.score_cards.map(c => `
                <div class="score ${c.kind}">
                    <span class="badge ${c.kind}">${c.badge}</span> ${c.processor}
                    <div class="value">${c.value}</div>
                    <div>${c.label}</div>
                </div>`).join('');
            document.getElementById('metrics').innerHTML = r.metrics.map(g => `
                <h4>${g.title}</h4>
                ${g.bars.map(b => `<div>${b.processor}: ${b.value}</div>
                    <div class="bar"><div class="${b.kind}" style="width: ${b.width_pct}%"></div></div>`).join('')}`).join('');
            const first = r.result.first.processor.name, second = r.result.second.processor.name;
            document.getElementById('details').innerHTML =
                `<tr><th>Specification</th><th>${first}</th><th>${second}</th></tr>` +
                r.details.map(d => `<tr><td>${d.label}</td><td>${d.first}</td><td>${d.second}</td></tr>`).join('');
            drawChart('overview-chart', r.charts.overview);
            document.getElementById('single-box').classList.toggle('hidden', !r.charts.single_thread);
            drawChart('single-chart', r.charts.single_thread);
            drawChart('multi-chart', r.charts.multi_thread);
        }

        async function runQuantity() {
            const params = new URLSearchParams({
                source_type: document.getElementById('q-source-type').value,
                source: document.getElementById('q-source').value,
                target_type: document.getElementById('q-target-type').value,
                target: document.getElementById('q-target').value,
                quantity: document.getElementById('q-quantity').value,
                workload: document.getElementById('workload').value,
            });
            try {
                const r = await getJson('/api/quantity?' + params);
                document.getElementById('quantity-results').classList.remove('hidden');
                document.getElementById('q-headline').textContent = r.headline;
                document.getElementById('q-note').textContent = r.note;
                drawChart('quantity-chart', r.chart);
            } catch (e) { showError(e.message); }
        }

        function mixValues() {
            return ['pi', 'tpcc', 'commercial', 'mixed', 'bi'].map(k =>
                [k, parseInt(document.getElementById('mix-' + k).value) || 0]);
        }

        function updateMixTotal() {
            const total = mixValues().reduce((sum, [, v]) => sum + v, 0);
            const el = document.getElementById('mix-total');
            el.textContent = `Total: ${total}%`;
            el.classList.toggle('invalid', total !== 100);
        }

        async function runMigrate() {
            const params = new URLSearchParams({
                mips: document.getElementById('m-mips').value,
                utilization: document.getElementById('m-util').value,
                workload: document.getElementById('m-workload').value,
                target: document.getElementById('m-target').value,
                ...Object.fromEntries(mixValues()),
            });
            try {
                const r = await getJson('/api/migrate?' + params);
                document.getElementById('migrate-results').classList.remove('hidden');
                document.getElementById('m-summary').textContent = r.summary;
                document.getElementById('m-tpm').textContent = r.required_tpm_display;
                const platform = (text, sizing) => text ? `
                    <div class="card" style="flex: 1">
                        <h3>${text.heading}</h3>
                        <p><strong>${text.cores_line}</strong></p>
                        <p>${text.basis_line}</p>
                        <h4>Recommended configuration</h4>
                        <ul>${sizing.recommendation.map(l => `<li>${l}</li>`).join('')}</ul>
                        <h4>Advantages</h4>
                        <ul>${sizing.advantages.map(l => `<li>${l}</li>`).join('')}</ul>
                    </div>` : '';
                document.getElementById('m-platforms').innerHTML =
                    platform(r.power, r.result.power) + platform(r.intel, r.result.intel);
                drawChart('migrate-chart', r.chart);
            } catch (e) { showError(e.message); }
        }

        document.querySelectorAll('.tab').forEach(t => t.addEventListener('click', () => setMode(t.dataset.mode)));
        document.getElementById('compare-btn').addEventListener('click', runCompare);
        document.getElementById('export-btn').addEventListener('click', () => {
            window.location = '/api/export?' + compareParams();
        });
        document.getElementById('workload').addEventListener('change', e => showWorkloadInfo(e.target.value));
        document.getElementById('q-source-type').addEventListener('change', () => fillQuantity('source'));
        document.getElementById('q-target-type').addEventListener('change', () => fillQuantity('target'));
        document.getElementById('quantity-btn').addEventListener('click', runQuantity);
        document.getElementById('m-workload').addEventListener('change', e =>
            document.getElementById('mix').classList.toggle('hidden', e.target.value !== 'custom'));
        document.querySelectorAll('.mix').forEach(i => i.addEventListener('input', updateMixTotal));
        document.getElementById('migrate-btn').addEventListener('click', runMigrate);

        loadSelectors().catch(e => showError('Failed to load processor data: ' + e.message));
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Datasets, PrefsStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PrefsStore::new(dir.path().join("prefs.json"));
        (Datasets::embedded().unwrap(), prefs, dir)
    }

    fn get(target: &str, data: &Datasets, prefs: &PrefsStore) -> Response {
        let (path, query) = parse_request_line(&format!("GET {} HTTP/1.1", target)).unwrap();
        route(&path, &query, data, prefs)
    }

    #[test]
    fn query_strings_are_decoded() {
        let (path, query) = parse_request_line("GET /api/compare?mode=all&workload=tpc-c&x=a%20b+c HTTP/1.1").unwrap();
        assert_eq!(path, "/api/compare");
        assert_eq!(query["mode"], "all");
        assert_eq!(query["x"], "a b c");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%2Fx"), "/x");
    }

    #[test]
    fn malformed_escapes_pass_through() {
        assert_eq!(percent_decode("%"), "%");
        assert_eq!(percent_decode("50%"), "50%");
        assert_eq!(percent_decode("%4"), "%4");
        assert_eq!(percent_decode("%zz1"), "%zz1");
        assert_eq!(percent_decode("a+b%2Bc"), "a b+c");
        assert_eq!(percent_decode("caf%C3%A9"), "café");
    }

    #[test]
    fn request_line_without_query() {
        let (path, query) = parse_request_line("GET /api/selectors HTTP/1.1").unwrap();
        assert_eq!(path, "/api/selectors");
        assert!(query.is_empty());

        // Pairs without '=' are dropped, later duplicates win
        let (_, query) = parse_request_line("GET /?flag&a=1&a=2 HTTP/1.1").unwrap();
        assert!(!query.contains_key("flag"));
        assert_eq!(query["a"], "2");
    }

    #[test]
    fn only_get_is_accepted() {
        assert!(parse_request_line("POST /api/compare HTTP/1.1").is_none());
        assert!(parse_request_line("").is_none());
    }

    #[test]
    fn compare_saves_preference() {
        let (data, prefs, _dir) = fixture();
        let res = get(
            "/api/compare?mode=power-intel&power=power9-22c&intel=xeon-gold-6148&workload=commercial",
            &data,
            &prefs,
        );
        assert_eq!(res.status, 200);
        let body: serde_json::Value = serde_json::from_str(&res.body).unwrap();
        assert!(body["summary"].as_str().unwrap().contains("POWER9"));
        assert_eq!(body["charts"]["overview"]["type"], "radar");
        assert_eq!(prefs.preferred_workload().as_deref(), Some("commercial"));
    }

    #[test]
    fn validation_errors_are_400() {
        let (data, prefs, _dir) = fixture();
        let res = get("/api/compare?mode=power-intel&workload=mixed&intel=xeon-gold-6148", &data, &prefs);
        assert_eq!(res.status, 400);
        let body: serde_json::Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(body["error"], "Please select a POWER processor.");

        let res = get("/api/migrate?mips=1000&utilization=80&workload=custom&target=both&pi=50", &data, &prefs);
        assert_eq!(res.status, 400);
        assert!(res.body.contains("100%"));
    }

    #[test]
    fn wrapping_mix_is_a_400() {
        let (data, prefs, _dir) = fixture();
        let res = get(
            "/api/migrate?mips=1000&utilization=80&workload=custom&target=both&pi=4294967295&tpcc=101",
            &data,
            &prefs,
        );
        assert_eq!(res.status, 400);
        let body: serde_json::Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(body["error"], "Custom workload mix must add up to 100%.");
        assert!(res.to_http().starts_with("HTTP/1.1 400 Bad Request\r\nContent-Type: application/json\r\n"));
    }

    #[test]
    fn compare_scales_first_processor_quantity() {
        let (data, prefs, _dir) = fixture();
        let res = get(
            "/api/compare?mode=power-intel&power=power9-22c&intel=xeon-gold-6148&workload=commercial&quantity=3",
            &data,
            &prefs,
        );
        assert_eq!(res.status, 200);
        let body: serde_json::Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(body["result"]["first_quantity"], 3);
        assert_eq!(body["score_cards"][2]["value"], 31_200.0);
        assert!(body["summary"].as_str().unwrap().contains("based on 3x"));

        // Non-numeric quantity counts as one unit
        let res = get(
            "/api/compare?mode=power-intel&power=power9-22c&intel=xeon-gold-6148&workload=commercial&quantity=lots",
            &data,
            &prefs,
        );
        let body: serde_json::Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(body["result"]["first_quantity"], 1);
    }

    #[test]
    fn migrate_reports_cores() {
        let (data, prefs, _dir) = fixture();
        let res = get("/api/migrate?mips=1000&utilization=80&workload=commercial&target=both", &data, &prefs);
        assert_eq!(res.status, 200);
        let body: serde_json::Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(body["required_tpm_display"], "96,000");
        assert_eq!(body["result"]["intel"]["required_cores"], 4);
    }

    #[test]
    fn export_is_an_attachment() {
        let (data, prefs, _dir) = fixture();
        let res = get(
            "/api/export?mode=power-mainframe&power=power8-10c&mainframe=z10ec-2097-716&workload=tpc-c",
            &data,
            &prefs,
        );
        assert_eq!(res.status, 200);
        assert!(res.body.starts_with("PROCESSOR COMPARISON RESULTS"));
        let http = res.to_http();
        assert!(http.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(http.contains(&format!("Content-Disposition: attachment; filename=\"{}\"\r\n", EXPORT_FILE_NAME)));

        // Plain JSON responses carry no disposition header
        let res = get("/api/selectors", &data, &prefs);
        assert!(!res.to_http().contains("Content-Disposition"));
    }

    #[test]
    fn workload_info_and_unknown_paths() {
        let (data, prefs, _dir) = fixture();
        assert_eq!(get("/api/workloads/tpc-c", &data, &prefs).status, 200);
        assert_eq!(get("/api/workloads/nope", &data, &prefs).status, 400);
        let missing = get("/nope", &data, &prefs);
        assert_eq!(missing.status, 404);
        assert!(missing.to_http().starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert_eq!(get("/", &data, &prefs).content_type, "text/html; charset=utf-8");
    }
}
