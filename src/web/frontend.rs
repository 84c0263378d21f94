//! Embedded HTML/CSS/JS frontend for the crashscope dashboard.
//!
//! The whole page is compiled into the binary as a string constant. It only
//! collects filters and draws what `/api/search` returns; the frequency
//! tables and their colors are computed server-side.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>crashscope</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: var(--bg); color: var(--text); font-family: var(--font); font-size: 14px; line-height: 1.5; }

.app { max-width: 1200px; margin: 0 auto; padding: 24px; }
header { display: flex; align-items: center; justify-content: space-between; margin-bottom: 24px; padding-bottom: 16px; border-bottom: 1px solid var(--border); }
header h1 { font-size: 24px; font-weight: 600; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.card { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); padding: 16px; margin-bottom: 16px; }

form .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 12px; }
label { display: block; color: var(--text-muted); font-size: 12px; margin-bottom: 4px; }
input, select { width: 100%; padding: 8px; background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: 6px; }
button { padding: 8px 16px; border-radius: 6px; border: 1px solid var(--border); background: var(--surface); color: var(--text); cursor: pointer; }
button.primary { width: 100%; margin-top: 16px; background: var(--accent); border-color: var(--accent); color: #0d1117; font-weight: 600; }
button:disabled { opacity: .5; cursor: default; }

.toggle { display: flex; gap: 8px; margin-bottom: 16px; }
.toggle button.active { border-color: var(--accent); color: var(--accent); }

.error { border-color: var(--red); color: var(--red); }
.muted { color: var(--text-muted); text-align: center; }

.records .card .grid { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; }
.records h3 { font-size: 12px; color: var(--text-muted); font-weight: 600; }
.records .sub { color: var(--text-muted); font-size: 12px; }
.records ul { padding-left: 18px; }
.wide { grid-column: span 2; }

.charts { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
.charts h2 { font-size: 15px; margin-bottom: 12px; }
.pie { width: 160px; height: 160px; border-radius: 50%; margin: 0 auto 12px; }
.legend div { display: flex; align-items: center; gap: 6px; font-size: 12px; }
.swatch { width: 10px; height: 10px; border-radius: 2px; flex: none; }
.bar-row { display: grid; grid-template-columns: 140px 1fr 40px; align-items: center; gap: 8px; font-size: 12px; margin-bottom: 4px; }
.bar { height: 12px; border-radius: 3px; }
</style>
</head>
<body>
<div class="app">
  <header>
    <div>
      <h1>Vehicle Collision Search</h1>
      <div class="subtitle">crashscope dashboard</div>
    </div>
  </header>

  <form id="filters" class="card">
    <div class="grid">
      <div><label>Vehicle Type</label><input name="vehicle_type" placeholder="e.g., Sedan, SUV"></div>
      <div><label>Vehicle Make</label><input name="vehicle_make" data-upper placeholder="e.g., FORD, BMW, NISS"></div>
      <div><label>Vehicle Model</label><input name="vehicle_model" data-upper placeholder="e.g., X5, 325i, ACCORD"></div>
      <div><label>Vehicle Year</label><input name="vehicle_year" placeholder="e.g., 2020"></div>
      <div><label>Driver Sex</label>
        <select name="driver_sex"><option value="">Any</option><option value="M">Male</option><option value="F">Female</option></select>
      </div>
      <div><label>License Status</label><input name="driver_license_status" placeholder="e.g., Licensed, Suspended"></div>
      <div><label>State Registration</label><input name="state_registration" placeholder="e.g., NY, NJ"></div>
      <div><label>Travel Direction</label><input name="travel_direction" placeholder="e.g., North, South"></div>
      <div><label>Date From</label><input name="date_from" type="date"></div>
      <div><label>Date To</label><input name="date_to" type="date"></div>
    </div>
    <button id="submit" class="primary" type="submit">Search Accidents</button>
  </form>

  <div class="toggle">
    <button data-view="detail">Details</button>
    <button data-view="analytics">Analytics</button>
  </div>

  <div id="output"></div>
</div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let report = null;
let loading = false;
let view = 'detail';

const form = document.getElementById('filters');
const output = document.getElementById('output');

function esc(s) {
  return String(s).replace(/[&<>"']/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));
}

function show(v) {
  return esc(v === null || v === undefined || v === '' ? 'Unknown' : v);
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------
form.querySelectorAll('[data-upper]').forEach(el => {
  el.addEventListener('input', () => { el.value = el.value.toUpperCase(); });
});

form.addEventListener('submit', async e => {
  e.preventDefault();
  const filters = {};
  new FormData(form).forEach((value, key) => { if (value !== '') filters[key] = value; });

  loading = true;
  report = null;
  render();
  try {
    const res = await fetch('/api/search', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(filters),
    });
    const data = await res.json();
    report = res.ok ? data : { accidents: [], error: data.error || 'Request failed', analytics: null };
  } catch (err) {
    report = { accidents: [], error: err.message || 'Request failed', analytics: null };
  } finally {
    loading = false;
    render();
  }
});

document.querySelectorAll('.toggle button').forEach(btn => {
  btn.addEventListener('click', () => { view = btn.dataset.view; render(); });
});

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------
function render() {
  document.getElementById('submit').disabled = loading;
  document.getElementById('submit').textContent = loading ? 'Searching...' : 'Search Accidents';
  document.querySelectorAll('.toggle button').forEach(b => b.classList.toggle('active', b.dataset.view === view));

  if (report && report.error) {
    output.innerHTML = `<div class="card error">${esc(report.error)}</div>`;
  } else if (loading) {
    output.innerHTML = '<div class="muted">Searching...</div>';
  } else if (!report || report.accidents.length === 0) {
    output.innerHTML = '<div class="muted">No accidents found. Use the filters to search for accidents.</div>';
  } else if (view === 'analytics') {
    output.innerHTML = renderCharts(report.analytics);
  } else {
    output.innerHTML = renderCards(report.accidents);
  }
}

function renderCards(accidents) {
  const list = items => (items && items.length)
    ? '<ul>' + items.map(i => `<li>${show(i)}</li>`).join('') + '</ul>'
    : '<p>Unknown</p>';
  return `<h2>Accident Results (${accidents.length} found)</h2><div class="records">` + accidents.map(a => {
    const v = a.vehicle || {}, d = a.driver || {}, c = a.crash || {};
    return `<div class="card"><div class="grid">
      <div><h3>Date &amp; Time</h3><p>${show(a.date)} at ${show(a.time)}</p></div>
      <div><h3>Vehicle</h3><p>${show(v.year)} ${show(v.make)} ${show(v.model)}</p>
        <p class="sub">Type: ${show(v.type)} | State: ${show(v.state)} | Occupants: ${show(v.occupants)}</p></div>
      <div><h3>Driver</h3><p>${show(d.sex)} | ${show(d.license_status)}</p>
        <p class="sub">License State: ${show(d.license_jurisdiction)}</p></div>
      <div><h3>Crash</h3><p>${show(c.pre_crash)} | ${show(c.travel_direction)}</p>
        <p class="sub">Impact: ${show(c.point_of_impact)}</p></div>
      <div><h3>Damage Locations</h3>${list(a.damage_locations)}</div>
      <div><h3>Contributing Factors</h3>${list(a.contributing_factors)}</div>
      <div class="wide"><h3>Public Property Damage</h3><p>${show(a.public_property_damage)}</p></div>
    </div></div>`;
  }).join('') + '</div>';
}

function renderCharts(analytics) {
  if (!analytics) return '';
  const widgets = [
    ['Vehicle Types', analytics.vehicle_types, pie],
    ['Time of Day', analytics.time_of_day, bars],
    ['License Status', analytics.license_status, pie],
    ['Damage Locations', analytics.damage_locations, bars],
  ];
  return '<div class="charts">' + widgets
    .filter(([, table]) => table)
    .map(([title, table, draw]) => `<div class="card"><h2>${title}</h2>${table.length ? draw(table) : '<p class="muted">no data</p>'}</div>`)
    .join('') + '</div>';
}

function pie(table) {
  const total = table.reduce((sum, e) => sum + e.count, 0) || 1;
  let at = 0;
  const stops = table.map(e => {
    const from = at;
    at += e.count / total * 360;
    return `${e.color} ${from}deg ${at}deg`;
  });
  const legend = table.map(e =>
    `<div><span class="swatch" style="background:${e.color}"></span>${esc(e.label)} (${e.count})</div>`).join('');
  return `<div class="pie" style="background:conic-gradient(${stops.join(',')})"></div><div class="legend">${legend}</div>`;
}

function bars(table) {
  const max = Math.max(...table.map(e => e.count), 1);
  return table.map(e => `<div class="bar-row"><span>${esc(e.label)}</span>
    <div class="bar" style="width:${e.count / max * 100}%;background:${e.color}"></div><span>${e.count}</span></div>`).join('');
}

render();
</script>
</body>
</html>
"##;
