//! Handlebars sources for every rendered fragment.
//!
//! Double-brace expressions are HTML-escaped; none of these templates use
//! the raw triple-brace form except `docs_page`, whose body is already HTML.

pub(super) const RELEASES: &str = r#"<div class="releases-list">
{{#each releases}}
  <div class="release-card">
    <div class="release-header">
      <div>
        <span class="release-version">{{title}}</span>
        {{#if latest}}<span class="release-tag latest">Latest</span>{{/if}}
        {{#if prerelease}}<span class="release-tag">Pre-release</span>{{/if}}
      </div>
      {{#if date}}<span class="release-date">{{date}}</span>{{/if}}
    </div>
    {{#if notes}}<div class="release-notes">{{notes}}</div>{{/if}}
    <div class="release-assets">
      {{#if assets}}
      {{#each assets}}
      <a href="{{url}}" class="btn btn-primary">
        ⬇️ {{name}}
        {{#if size_mb}}<span class="asset-size">({{size_mb}} MB)</span>{{/if}}
      </a>
      {{/each}}
      {{else}}
      <a href="{{page_url}}" class="btn btn-secondary" target="_blank">
        View on GitHub
      </a>
      {{/if}}
    </div>
  </div>
{{/each}}
</div>
"#;

pub(super) const EMPTY: &str = r#"<div class="no-releases">
  <p>No releases yet.</p>
  <p class="mt-1">{{hint}}</p>
</div>
"#;

pub(super) const ERROR: &str = r#"<div class="error-releases">
  <p>Failed to load releases.</p>
  <p class="mt-1">
    <a href="{{fallback_url}}" target="_blank">
      {{fallback_label}} →
    </a>
  </p>
</div>
"#;

pub(super) const OPEN_PAGE: &str = r#"<div id="loading-state" style="display: {{#if fallback}}none{{else}}block{{/if}}">
  <div class="spinner"></div>
  <p>Opening People Tracker…</p>
</div>
<div id="fallback-state" style="display: {{#if fallback}}block{{else}}none{{/if}}">
  <h2>App not installed?</h2>
  <p>Download the latest APK to get started.</p>
  <a href="{{download_url}}" class="btn btn-primary">Download it here</a>
</div>
"#;

pub(super) const DOCS_PAGE: &str = r#"<div id="content">
{{{body}}}
</div>
"#;

pub(super) const DOCS_ERROR: &str = r#"<div id="content">
  <h1>Error Loading Documentation</h1>
  <p>Could not load the documentation.
    <a href="{{source_url}}">View on GitHub</a>
  </p>
</div>
"#;
