use leaf_site::ssg::DEFAULT_TEMPLATE;
use leaf_site::{LeafConfig, SiteBuilder, generate_routes_module, write_site};
use std::fs;
use std::path::Path;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write(
        root,
        "leaf.config.yaml",
        r#"title: Leaf Docs
theme:
  sidebar:
    /guide/:
      - text: Guide
        items:
          - text: Getting Started
            link: /guide/getting-started
          - text: Components
            link: /guide/components
  editLink:
    pattern: https://github.com/leaf/leaf/edit/main/docs/:path
markdown:
  copyCode: true
"#,
    );
    write(
        root,
        "docs/index.md",
        "---\ntitle: Home\ndescription: Leaf home\n---\n# Leaf\n\n## Why Leaf\n\nFast.\n",
    );
    write(
        root,
        "docs/guide/getting-started.md",
        "---\ntitle: Getting Started\n---\n# Getting Started\n\n## Install\n\n::: code-group\n\n```sh [npm]\nnpm i leaf\n```\n\n```sh [pnpm]\npnpm add leaf\n```\n\n:::\n\n## Configure\n\n::: warning Careful\nCheck the <span>config</span>.\n:::\n",
    );
    write(
        root,
        "docs/guide/components.md",
        "---\ntitle: Components\n---\n# Components\n\n## Cards\n\n<Cards cards='[{\"icon\":\"🚀\",\"title\":\"Quick Start\"}]' columns=\"2\" />\n\nThat is all.\n",
    );
    dir
}

#[test]
fn builds_and_writes_a_site() {
    let dir = fixture();
    let config = LeafConfig::load(dir.path());
    assert_eq!(config.title, "Leaf Docs");

    let build = SiteBuilder::new(dir.path(), config.clone()).build();
    assert!(build.is_clean(), "{:?} {:?}", build.route_failures, build.page_failures);
    assert_eq!(build.stats.succeeded, 3);

    let paths: Vec<&str> = build.pages.iter().map(|p| p.route.url_path.as_str()).collect();
    assert_eq!(paths, vec!["/guide/components", "/guide/getting-started", "/"]);

    let components = &build.pages[0];
    assert_eq!(components.components.len(), 1);
    assert_eq!(components.components[0].name, "Cards");
    assert_eq!(components.components[0].props["columns"], 2);
    assert_eq!(components.components[0].props["cards"][0]["title"], "Quick Start");
    assert!(!components.html.contains("<Cards"), "{}", components.html);
    assert_eq!(
        components.footer.prev.as_ref().map(|link| link.link.as_str()),
        Some("/guide/getting-started")
    );
    assert_eq!(components.footer.next, None);

    let started = &build.pages[1];
    assert!(started.html.contains("code-copy-btn"), "{}", started.html);
    assert!(started.html.contains("custom-block-warning"), "{}", started.html);
    assert!(started.html.contains("<span>config</span>"), "{}", started.html);
    assert_eq!(
        started.footer.edit_link.as_ref().map(|link| link.url.as_str()),
        Some("https://github.com/leaf/leaf/edit/main/docs/guide/getting-started.md")
    );

    for page in &build.pages {
        for entry in &page.toc {
            let anchor = format!("id=\"{}\"", entry.id);
            assert_eq!(
                page.html.matches(&anchor).count(),
                1,
                "{} in {}",
                anchor,
                page.html
            );
        }
    }

    let out = dir.path().join("dist");
    let report = write_site(&build.pages, &out, DEFAULT_TEMPLATE, &config);
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.written.len(), 3);

    let home = fs::read_to_string(out.join("index.html")).expect("home page");
    assert!(home.contains("<title>Home | Leaf Docs</title>"), "{}", home);
    assert!(home.contains(r#"content="Leaf home""#), "{}", home);
    assert!(out.join("guide/getting-started/index.html").is_file());

    let routes: Vec<_> = build.pages.iter().map(|page| page.route.clone()).collect();
    let module = generate_routes_module(&routes);
    assert!(module.contains("import Route2, { toc as toc2 }"), "{}", module);
    assert!(module.contains("path: \"/guide/components\", component: Route0"), "{}", module);
}
