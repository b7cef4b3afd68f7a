//! Markdown and HTML renderers for the normalized dataset.
//!
//! Both are thin, deterministic walks over the canonical dataset: category
//! sections in the configured order, artists and titles sorted within.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::models::{Dataset, Song, UNCATEGORIZED};

type GroupedSongs<'a> = BTreeMap<String, BTreeMap<String, Vec<&'a Song>>>;

/// Group songs by category, then by artist display name. BTreeMap keys
/// give the sorted artist walk for free; title order is fixed afterwards.
fn group_by_category_artist(dataset: &Dataset) -> GroupedSongs<'_> {
    let mut by_cat: GroupedSongs = BTreeMap::new();
    for song in &dataset.songs {
        let category = if song.category.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            song.category.clone()
        };
        let artist = song.artist.clone().unwrap_or_else(|| "Unknown".to_string());
        by_cat
            .entry(category)
            .or_default()
            .entry(artist)
            .or_default()
            .push(song);
    }
    for artists in by_cat.values_mut() {
        for songs in artists.values_mut() {
            songs.sort_by_key(|s| s.title.clone().unwrap_or_default());
        }
    }
    by_cat
}

/// Categories in render order: the provided order first, then any extra
/// categories found in the data (sorted), with `Uncategorized` last.
fn render_order(grouped: &GroupedSongs, categories_order: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = categories_order.to_vec();
    let mut extras: Vec<String> = grouped
        .keys()
        .filter(|c| !categories_order.contains(c) && c.as_str() != UNCATEGORIZED)
        .cloned()
        .collect();
    extras.sort();
    ordered.extend(extras);
    if !ordered.iter().any(|c| c == UNCATEGORIZED) && grouped.contains_key(UNCATEGORIZED) {
        ordered.push(UNCATEGORIZED.to_string());
    }
    ordered
}

/// Render the songbook as a markdown outline: one `##` section per
/// populated category, `###` per artist, one bullet per title.
pub fn render_markdown(dataset: &Dataset, categories_order: &[String]) -> String {
    let grouped = group_by_category_artist(dataset);

    let mut lines: Vec<String> = Vec::new();
    lines.push("# Songbook".to_string());

    for category in render_order(&grouped, categories_order) {
        let Some(artists) = grouped.get(&category) else { continue };
        lines.push(String::new());
        lines.push(format!("## {category}"));
        for (artist, songs) in artists {
            lines.push(String::new());
            lines.push(format!("### {artist}"));
            for song in songs {
                lines.push(format!("- {}", song.title.as_deref().unwrap_or("")));
            }
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Static client shell: embedded CSS and vanilla JS that fetches
/// `songbook.json` from the same directory and renders one accordion per
/// category with substring filtering. The dataset is also embedded as a
/// fallback for file:// usage where fetch is unavailable.
pub fn render_index_html(dataset: &Dataset) -> Result<String> {
    // "</" would terminate the embedding <script> early.
    let json = serde_json::to_string(dataset)?.replace("</", "<\\/");
    Ok(INDEX_HTML.replace("__SONGBOOK_JSON__", &json))
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Songbook</title>
  <style>
    :root {
      --bg: #0f1115;
      --panel: #171a21;
      --text: #e6ebf1;
      --muted: #9aa5b1;
      --accent: #7aa2f7;
      --border: #2a2f3a;
      --highlight: #2b3b6b;
    }
    * { box-sizing: border-box; }
    html, body { margin: 0; padding: 0; background: var(--bg); color: var(--text); font-family: system-ui, -apple-system, Segoe UI, Roboto, Helvetica, Arial, sans-serif; }
    header { padding: 20px 16px; max-width: 900px; margin: 0 auto; }
    h1 { margin: 0 0 6px; font-size: 1.6rem; font-weight: 650; }
    p.subtitle { margin: 0; color: var(--muted); }
    .search { margin-top: 14px; display: flex; gap: 10px; align-items: center; }
    .search label { font-size: 0.9rem; color: var(--muted); }
    .search input { flex: 1; padding: 10px 12px; background: var(--panel); border: 1px solid var(--border); border-radius: 8px; color: var(--text); outline: none; }
    .search input:focus { border-color: var(--accent); box-shadow: 0 0 0 3px rgba(122,162,247,0.15); }
    main { max-width: 900px; margin: 8px auto 40px; padding: 0 16px; }
    details { background: var(--panel); border: 1px solid var(--border); border-radius: 10px; margin: 10px 0; overflow: hidden; }
    summary { list-style: none; cursor: pointer; padding: 12px 14px; font-weight: 600; display: flex; align-items: center; gap: 8px; }
    summary::-webkit-details-marker { display: none; }
    summary .count { color: var(--muted); font-weight: 500; font-size: 0.9rem; }
    ul.songs { margin: 0; padding: 8px 0 12px; }
    li.song { display: flex; gap: 8px; align-items: baseline; padding: 6px 14px; border-top: 1px solid var(--border); }
    li.song:hover { background: var(--highlight); }
    .title { font-weight: 600; }
    .dash { color: var(--muted); margin: 0 4px; }
    .artist { color: var(--muted); font-weight: 500; }
    .no-results { color: var(--muted); padding: 12px 6px 0; }
  </style>
</head>
<body>
  <header>
    <h1>Songbook</h1>
    <p class="subtitle">Browse by category or search title/artist.</p>
    <div class="search">
      <label for="q">Search</label>
      <input id="q" type="search" placeholder="Type to filter…" autocomplete="off" spellcheck="false" />
    </div>
  </header>
  <main id="app" aria-live="polite"></main>
  <script type="application/json" id="songbook">__SONGBOOK_JSON__</script>
  <script>
  (function() {
    const app = document.getElementById('app');
    const input = document.getElementById('q');

    const norm = (s) => (s || '').normalize('NFKD').replace(/\p{Diacritic}+/gu,'').toLowerCase();
    function render(data) {
      const q = norm(input.value);
      const byCat = new Map(data.categories.map(c => [c, []]));
      for (const s of data.songs) {
        const hay = norm(s.title + ' ' + (s.artist || '') + ' ' + (s.category || ''));
        if (q && !hay.includes(q)) continue;
        const c = byCat.has(s.category) ? s.category : 'Uncategorized';
        byCat.get(c).push(s);
      }

      app.innerHTML = '';
      let any = false;
      for (const c of data.categories) {
        const list = byCat.get(c) || [];
        if (!list.length) continue;
        any = true;
        const details = document.createElement('details');
        const summary = document.createElement('summary');
        summary.innerHTML = `<span>${c}</span> <span class="count">(${list.length})</span>`;
        details.appendChild(summary);

        const ul = document.createElement('ul');
        ul.className = 'songs';
        for (const s of list) {
          const li = document.createElement('li');
          li.className = 'song';
          li.innerHTML = `<span class="title">${s.title}</span><span class="dash">—</span><span class="artist">${s.artist || ''}</span>`;
          ul.appendChild(li);
        }
        details.appendChild(ul);
        app.appendChild(details);
      }

      if (!any) {
        const p = document.createElement('p');
        p.className = 'no-results';
        p.textContent = 'No matches.';
        app.appendChild(p);
      }
    }

    function boot(data) {
      render(data);
      input.addEventListener('input', () => render(data));
    }

    fetch('./songbook.json', { cache: 'no-store' })
      .then((res) => { if (!res.ok) throw new Error('fetch failed'); return res.json(); })
      .then(boot)
      .catch(() => {
        try {
          boot(JSON.parse(document.getElementById('songbook').textContent));
        } catch {
          app.innerHTML = '<p class="no-results">Could not load data.</p>';
        }
      });
  })();
  </script>
</body>
</html>
"#;
