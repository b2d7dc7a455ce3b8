use axum::{
    http::header,
    response::{Html, IntoResponse},
};

pub async fn dashboard() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Html(DASHBOARD_HTML),
    )
}

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Temperature &amp; Humidity Trends</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/uplot@1.6.31/dist/uPlot.min.css">
    <style>
        :root {
            --bg: #f8fafc;
            --surface: #ffffff;
            --border: #e2e8f0;
            --text: #1e293b;
            --muted: #64748b;
            --accent: #2563eb;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); min-height: 100vh; }

        .layout { display: flex; min-height: 100vh; }
        .sidebar {
            width: 270px;
            flex-shrink: 0;
            background: var(--surface);
            border-right: 1px solid var(--border);
            padding: 1.25rem;
        }
        .sidebar h2 { font-size: 0.95rem; margin-bottom: 1rem; }
        .field { margin-bottom: 0.9rem; }
        .field label { display: block; font-size: 0.75rem; color: var(--muted); margin-bottom: 0.25rem; }
        .field input, .field select {
            width: 100%;
            padding: 0.35rem 0.5rem;
            border: 1px solid var(--border);
            border-radius: 0.375rem;
            font-size: 0.8rem;
            background: var(--surface);
            color: var(--text);
        }
        .time-pair { display: flex; gap: 0.5rem; }
        .check-list {
            max-height: 140px;
            overflow-y: auto;
            border: 1px solid var(--border);
            border-radius: 0.375rem;
            padding: 0.35rem 0.5rem;
            font-size: 0.8rem;
        }
        .check-list label { display: flex; align-items: center; gap: 0.4rem; padding: 0.1rem 0; cursor: pointer; }
        .check-list input { accent-color: var(--accent); }

        .main { flex: 1; padding: 1.5rem; max-width: 1100px; }
        h1 { font-size: 1.25rem; font-weight: 600; margin-bottom: 1.25rem; }

        .kpi-row { display: flex; gap: 1rem; flex-wrap: wrap; margin-bottom: 1.25rem; }
        .kpi-card {
            flex: 1;
            min-width: 150px;
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 0.75rem 1rem;
        }
        .kpi-card .kpi-label { font-size: 0.75rem; color: var(--muted); }
        .kpi-card .kpi-value { font-size: 1.4rem; font-weight: 600; font-variant-numeric: tabular-nums; }

        .panel {
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 1rem;
            margin-bottom: 1rem;
        }
        .panel h3 { font-size: 0.85rem; color: var(--muted); margin-bottom: 0.5rem; }

        .loc-row { display: flex; flex-wrap: wrap; gap: 0.75rem; font-size: 0.8rem; }
        .loc-row label { display: flex; align-items: center; gap: 0.35rem; cursor: pointer; }
        .loc-row input { accent-color: var(--accent); }

        .notice {
            padding: 1.5rem;
            text-align: center;
            color: var(--muted);
            font-size: 0.875rem;
        }

        .toolbar { display: flex; justify-content: flex-end; margin-bottom: 0.75rem; }
        .btn {
            padding: 0.45rem 0.9rem;
            border: 1px solid var(--border);
            border-radius: 0.375rem;
            font-size: 0.8rem;
            background: var(--surface);
            cursor: pointer;
        }
        .btn:hover { border-color: var(--accent); color: var(--accent); }

        table { width: 100%; border-collapse: collapse; font-size: 0.78rem; }
        th, td { text-align: left; padding: 0.3rem 0.5rem; border-bottom: 1px solid var(--border); font-variant-numeric: tabular-nums; }
        th { color: var(--muted); font-weight: 500; }
    </style>
</head>
<body>
<div class="layout">
    <aside class="sidebar">
        <h2>Filters</h2>
        <div class="field">
            <label for="start-date">Start</label>
            <div class="time-pair">
                <input type="date" id="start-date">
                <input type="time" id="start-time" step="1">
            </div>
        </div>
        <div class="field">
            <label for="end-date">End</label>
            <div class="time-pair">
                <input type="date" id="end-date">
                <input type="time" id="end-time" step="1">
            </div>
        </div>
        <div class="field">
            <label for="granularity">Time granularity</label>
            <select id="granularity">
                <option value="minute" selected>minute</option>
                <option value="hour">hour</option>
                <option value="day">day</option>
            </select>
        </div>
        <div class="field">
            <label>Site</label>
            <div class="check-list" id="site-list"></div>
        </div>
        <div class="field">
            <label>Room</label>
            <div class="check-list" id="room-list"></div>
        </div>
    </aside>

    <main class="main">
        <h1>&#127777;&#65039; Temperature &amp; &#128167; Humidity Trends</h1>

        <div id="kpi-row" class="kpi-row" style="display: none;">
            <div class="kpi-card"><div class="kpi-label">Avg Temp (&deg;C)</div><div class="kpi-value" id="kpi-avg-temp">--</div></div>
            <div class="kpi-card"><div class="kpi-label">Avg Humidity (%)</div><div class="kpi-value" id="kpi-avg-hum">--</div></div>
            <div class="kpi-card"><div class="kpi-label">Max Temp (&deg;C)</div><div class="kpi-value" id="kpi-max-temp">--</div></div>
            <div class="kpi-card"><div class="kpi-label">Min Temp (&deg;C)</div><div class="kpi-value" id="kpi-min-temp">--</div></div>
        </div>

        <div class="panel" id="loc-panel" style="display: none;">
            <h3>Locations to plot</h3>
            <div class="loc-row" id="loc-row"></div>
        </div>

        <div class="panel"><h3>Temperature Trend</h3><div id="chart-temp" class="notice">Loading...</div></div>
        <div class="panel"><h3>Humidity Trend</h3><div id="chart-hum" class="notice">Loading...</div></div>

        <div class="toolbar"><button class="btn" id="download-btn">Download CSV</button></div>
        <div class="panel"><h3>Aggregated data</h3><div id="data-table" class="notice">--</div></div>
    </main>
</div>

<script src="https://cdn.jsdelivr.net/npm/uplot@1.6.31/dist/uPlot.iife.min.js"></script>
<script>
const api = url => fetch(url).then(r => r.json());

const colors = ['#2563eb', '#dc2626', '#16a34a', '#ca8a04', '#9333ea', '#0891b2', '#be185d', '#ea580c'];

const state = {
    selectedLocations: null,  // null until the first response seeds the default
    charts: { temp: null, hum: null },
    data: null,
};

function debounce(fn, ms) {
    let timeout;
    return (...args) => {
        clearTimeout(timeout);
        timeout = setTimeout(() => fn(...args), ms);
    };
}

function pad(n) { return String(n).padStart(2, '0'); }

function setDateTime(dateId, timeId, d) {
    document.getElementById(dateId).value = `${d.getFullYear()}-${pad(d.getMonth() + 1)}-${pad(d.getDate())}`;
    document.getElementById(timeId).value = `${pad(d.getHours())}:${pad(d.getMinutes())}:${pad(d.getSeconds())}`;
}

// Compose the date input and the time-of-day refinement into one timestamp
function readDateTime(dateId, timeId) {
    const date = document.getElementById(dateId).value;
    const time = document.getElementById(timeId).value || '00:00:00';
    return new Date(`${date}T${time}`);
}

function renderCheckList(el, options, onChange) {
    el.innerHTML = options.map(o => `
        <label><input type="checkbox" value="${o}" checked><span>${o}</span></label>
    `).join('') || '<span style="color: var(--muted)">none</span>';
    el.querySelectorAll('input').forEach(cb => cb.addEventListener('change', onChange));
}

function checkedValues(el) {
    return [...el.querySelectorAll('input:checked')].map(cb => cb.value);
}

function trendsParams() {
    const params = new URLSearchParams({
        start: readDateTime('start-date', 'start-time').toISOString(),
        end: readDateTime('end-date', 'end-time').toISOString(),
    });
    const sites = checkedValues(document.getElementById('site-list'));
    const rooms = checkedValues(document.getElementById('room-list'));
    if (sites.length) params.set('sites', sites.join(','));
    if (rooms.length) params.set('rooms', rooms.join(','));
    if (state.selectedLocations !== null) params.set('locations', state.selectedLocations.join(','));
    return params;
}

const refresh = debounce(async () => {
    const granularity = document.getElementById('granularity').value;
    const data = await api(`/api/trends/${granularity}?${trendsParams()}`);
    state.data = data;

    if (data.no_data) {
        document.getElementById('kpi-row').style.display = 'none';
        document.getElementById('loc-panel').style.display = 'none';
        document.getElementById('chart-temp').innerHTML = 'No data found for the selected filters.';
        document.getElementById('chart-hum').innerHTML = 'No data found for the selected filters.';
        document.getElementById('data-table').innerHTML = '--';
        destroyCharts();
        return;
    }

    // KPIs are dataset-wide; they do not move with the location selection
    document.getElementById('kpi-row').style.display = 'flex';
    document.getElementById('kpi-avg-temp').textContent = data.kpis.avg_temp_c.toFixed(2);
    document.getElementById('kpi-avg-hum').textContent = data.kpis.avg_humidity.toFixed(1);
    document.getElementById('kpi-max-temp').textContent = data.kpis.max_temp_c.toFixed(2);
    document.getElementById('kpi-min-temp').textContent = data.kpis.min_temp_c.toFixed(2);

    // First response: default to the first 5 locations, then refetch restricted
    if (state.selectedLocations === null) {
        state.selectedLocations = data.locations.slice(0, 5);
        renderLocations(data.locations);
        refresh();
        return;
    }
    renderLocations(data.locations);

    renderChart('temp', data.times, data.temperature);
    renderChart('hum', data.times, data.humidity);
    renderTable(data);
}, 100);

function renderLocations(locations) {
    const panel = document.getElementById('loc-panel');
    const row = document.getElementById('loc-row');
    panel.style.display = 'block';
    row.innerHTML = locations.map((loc, i) => `
        <label style="color: ${colors[i % colors.length]}">
            <input type="checkbox" value="${loc}" ${state.selectedLocations.includes(loc) ? 'checked' : ''}>
            <span>${loc}</span>
        </label>
    `).join('');
    row.querySelectorAll('input').forEach(cb => cb.addEventListener('change', () => {
        state.selectedLocations = checkedValues(row);
        refresh();
    }));
}

function destroyCharts() {
    Object.keys(state.charts).forEach(k => {
        if (state.charts[k]) { state.charts[k].destroy(); state.charts[k] = null; }
    });
}

function renderChart(kind, times, columns) {
    const el = document.getElementById(`chart-${kind}`);
    if (!times.length || !columns.length) {
        el.innerHTML = 'Nothing selected.';
        if (state.charts[kind]) { state.charts[kind].destroy(); state.charts[kind] = null; }
        return;
    }

    const data = [times.map(t => new Date(t).getTime() / 1000)];
    const series = [{}];
    columns.forEach((col, i) => {
        data.push(col.values);
        series.push({
            label: col.location,
            stroke: colors[i % colors.length],
            width: 1.5,
            value: (u, v) => v == null ? '--' : v.toFixed(2),
        });
    });

    if (state.charts[kind]) state.charts[kind].destroy();
    el.innerHTML = '';
    state.charts[kind] = new uPlot({
        width: el.clientWidth || 800,
        height: 220,
        scales: { x: { time: true }, y: { auto: true } },
        axes: [
            { stroke: '#64748b', grid: { stroke: '#e2e8f0' } },
            { stroke: '#64748b', grid: { stroke: '#e2e8f0' } },
        ],
        series,
    }, data, el);
}

function renderTable(data) {
    const rows = [];
    data.times.forEach((t, i) => {
        data.temperature.forEach((col, c) => {
            const temp = col.values[i];
            const hum = data.humidity[c].values[i];
            if (temp == null && hum == null) return;
            rows.push(`<tr><td>${new Date(t).toLocaleString()}</td><td>${col.location}</td>
                <td>${temp == null ? '--' : temp.toFixed(2)}</td><td>${hum == null ? '--' : hum.toFixed(1)}</td></tr>`);
        });
    });

    document.getElementById('data-table').innerHTML = rows.length
        ? `<table><thead><tr><th>Bucket</th><th>Location</th><th>Avg Temp (&deg;C)</th><th>Avg Humidity (%)</th></tr></thead>
           <tbody>${rows.join('')}</tbody></table>`
        : '--';
}

document.getElementById('download-btn').addEventListener('click', () => {
    const granularity = document.getElementById('granularity').value;
    window.location = `/api/trends/${granularity}/export.csv?${trendsParams()}`;
});

async function init() {
    const [bounds, sites, rooms] = await Promise.all([
        api('/api/bounds'), api('/api/sites'), api('/api/rooms'),
    ]);

    setDateTime('start-date', 'start-time', new Date(bounds.default_start));
    setDateTime('end-date', 'end-time', new Date(bounds.max_ts));

    renderCheckList(document.getElementById('site-list'), sites, refresh);
    renderCheckList(document.getElementById('room-list'), rooms, refresh);

    document.getElementById('granularity').addEventListener('change', refresh);
    ['start-date', 'start-time', 'end-date', 'end-time'].forEach(id =>
        document.getElementById(id).addEventListener('change', refresh));

    refresh();
}

init();
</script>
</body>
</html>
"##;
