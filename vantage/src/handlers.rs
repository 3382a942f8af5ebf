use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use vantage_engine::engine::{ActivateModifier, Engine, ProtectedSeed};
use vantage_engine::perspective::{Perspective, ReduceConfig, VisibleGraph, VisibleNode};
use vantage_engine::state::VisibilityMode;
use vantage_graph::graph::RawGraph;
use vantage_graph::score::{ScoreCache, rank_nodes};

pub fn print_banner() {
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!(
        "{}",
        "  VANTAGE - attack surface graph explorer".bright_white().bold()
    );
    println!(
        "  {}",
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!("{}", "  For authorized security testing only.".yellow());
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!();
}

/// Load and index a snapshot from disk.
pub fn load_graph(path: &Path) -> anyhow::Result<RawGraph> {
    let graph = RawGraph::from_json_file(path)?;
    debug!(
        "Loaded snapshot: {} nodes, {} edges ({} dropped)",
        graph.node_count(),
        graph.edge_count(),
        graph.dropped_edge_count()
    );
    Ok(graph)
}

fn status_colored(status: u16) -> String {
    match status {
        100..=199 => format!("\x1b[37m{}\x1b[0m", status), // White
        200..=299 => format!("\x1b[32m{}\x1b[0m", status), // Green
        300..=399 => format!("\x1b[36m{}\x1b[0m", status), // Cyan
        400..=499 => format!("\x1b[33m{}\x1b[0m", status), // Orange/Yellow
        500..=599 => format!("\x1b[31m{}\x1b[0m", status), // Red
        _ => format!("{}", status),
    }
}

/// Render the visible graph as an indented, host-grouped text tree in the
/// same shape the crawl reports use.
pub fn render_text_report(graph: &RawGraph, visible: &VisibleGraph) -> String {
    let cluster_count = visible
        .nodes
        .iter()
        .filter(|node| node.cluster.is_some())
        .count();

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!(
        "  Nodes shown: {} of {}\n",
        visible.node_count() - cluster_count,
        graph.node_count()
    ));
    report.push_str(&format!("  Links: {}\n", visible.link_count()));
    report.push_str(&format!("  Clusters: {}\n", cluster_count));
    if graph.dropped_edge_count() > 0 {
        report.push_str(&format!(
            "  Dropped edges: {}\n",
            graph.dropped_edge_count()
        ));
    }
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut has_parent: HashSet<&str> = HashSet::new();
    for link in &visible.links {
        children
            .entry(link.source.as_str())
            .or_default()
            .push(link.target.as_str());
        has_parent.insert(link.target.as_str());
    }
    let by_id: HashMap<&str, &VisibleNode> = visible
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect();

    let mut visited: HashSet<String> = HashSet::new();
    for node in &visible.nodes {
        if has_parent.contains(node.id.as_str()) {
            continue;
        }
        render_subtree(
            &mut report,
            graph,
            &by_id,
            &children,
            node.id.as_str(),
            0,
            &mut visited,
        );
        report.push('\n');
    }

    report
}

fn render_subtree(
    report: &mut String,
    graph: &RawGraph,
    by_id: &HashMap<&str, &VisibleNode>,
    children: &HashMap<&str, Vec<&str>>,
    id: &str,
    depth: usize,
    visited: &mut HashSet<String>,
) {
    if !visited.insert(id.to_string()) {
        return;
    }
    let Some(node) = by_id.get(id) else {
        return;
    };

    if depth == 0 {
        report.push_str(&format!("## {}\n", node.label));
    } else {
        let indent = "  ".repeat(depth);
        if node.cluster.is_some() {
            report.push_str(&format!("{}\x1b[90m▸ {}\x1b[0m\n", indent, node.label));
        } else {
            let mut line = indent;
            if let Some(status) = node.status {
                line.push_str(&status_colored(status));
                line.push(' ');
            }
            line.push_str(&node.label);
            let findings = graph
                .node(id)
                .map(|raw| raw.findings.len())
                .unwrap_or(0);
            if findings > 0 {
                line.push_str(&format!(
                    " \x1b[31m[{} finding{}]\x1b[0m",
                    findings,
                    if findings == 1 { "" } else { "s" }
                ));
            }
            line.push('\n');
            report.push_str(&line);
        }
    }

    if let Some(child_ids) = children.get(id) {
        for child in child_ids {
            render_subtree(report, graph, by_id, children, child, depth + 1, visited);
        }
    }
}

pub fn generate_json_report(
    graph: &RawGraph,
    visible: &VisibleGraph,
) -> Result<String, serde_json::Error> {
    let cluster_count = visible
        .nodes
        .iter()
        .filter(|node| node.cluster.is_some())
        .count();

    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Vantage",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json",
                "disclaimer": "For authorized security testing only"
            },
            "summary": {
                "total_nodes": graph.node_count(),
                "visible_nodes": visible.node_count(),
                "visible_links": visible.link_count(),
                "clusters": cluster_count,
                "dropped_edges": graph.dropped_edge_count()
            },
            "graph": visible
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn loading_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message.to_string());
    spinner
}

pub fn handle_view(args: &ArgMatches) {
    let snapshot_path = args.get_one::<PathBuf>("snapshot").unwrap();
    let perspective = match args
        .get_one::<String>("perspective")
        .unwrap()
        .parse::<Perspective>()
    {
        Ok(perspective) => perspective,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return;
        }
    };
    let format = args.get_one::<String>("format").unwrap();

    let spinner = loading_spinner("Loading snapshot...");
    let graph = match load_graph(snapshot_path) {
        Ok(graph) => graph,
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("{} Failed to load snapshot: {}", "✗".red().bold(), e);
            return;
        }
    };

    let mut config = ReduceConfig::default();
    if let Some(&threshold) = args.get_one::<usize>("threshold") {
        config.directory_threshold = threshold;
        config.url_threshold = threshold;
    }
    if let Some(&page_size) = args.get_one::<usize>("page-size") {
        config.page_size = page_size;
    }

    let mut engine = Engine::with_config(graph, config);
    if args.get_flag("tree") {
        engine.set_mode(VisibilityMode::Expansion);
    } else {
        engine.set_mode(VisibilityMode::LevelCapped(
            *args.get_one::<u32>("max-level").unwrap(),
        ));
    }

    let mut seed = ProtectedSeed::default();
    if let Some(focus) = args.get_one::<String>("focus") {
        seed.selected = Some(focus.clone());
        engine.on_node_activate(focus, ActivateModifier::Primary);
    }

    spinner.set_message("Reducing graph...");
    let visible = engine.compute_visible_graph(&seed, perspective);
    spinner.finish_and_clear();

    let report = match format.as_str() {
        "text" => render_text_report(engine.graph(), &visible),
        "json" => match generate_json_report(engine.graph(), &visible) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("{} Failed to serialize report: {}", "✗".red().bold(), e);
                return;
            }
        },
        other => {
            eprintln!("{} Unknown format '{}'", "✗".red().bold(), other);
            return;
        }
    };

    if let Some(output) = args.get_one::<PathBuf>("output") {
        match save_report(&report, output) {
            Ok(()) => println!(
                "{} Report written to {}",
                "✓".green().bold(),
                output.display().to_string().bright_white()
            ),
            Err(e) => eprintln!("{} Failed to write report: {}", "✗".red().bold(), e),
        }
    } else {
        println!("{}", report);
    }
}

pub fn handle_rank(args: &ArgMatches) {
    let snapshot_path = args.get_one::<PathBuf>("snapshot").unwrap();
    let limit = *args.get_one::<usize>("limit").unwrap();

    let graph = match load_graph(snapshot_path) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("{} Failed to load snapshot: {}", "✗".red().bold(), e);
            return;
        }
    };

    let mut cache = ScoreCache::new();
    let ranked = rank_nodes(&graph, &mut cache, limit);

    println!(
        "{:>7}  {:<10} {:>6}  {}",
        "SCORE".bold(),
        "KIND".bold(),
        "STATUS".bold(),
        "NODE".bold()
    );
    for (id, score) in ranked {
        let Some(node) = graph.node(&id) else {
            continue;
        };
        let status = node
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>7}  {:<10} {:>6}  {}",
            score.to_string().bright_white(),
            node.kind.as_str().blue(),
            status,
            node.label
        );
    }
}

pub fn handle_search(args: &ArgMatches) {
    let snapshot_path = args.get_one::<PathBuf>("snapshot").unwrap();
    let query = args.get_one::<String>("QUERY").unwrap();
    let perspective = match args
        .get_one::<String>("perspective")
        .unwrap()
        .parse::<Perspective>()
    {
        Ok(perspective) => perspective,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return;
        }
    };

    let graph = match load_graph(snapshot_path) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("{} Failed to load snapshot: {}", "✗".red().bold(), e);
            return;
        }
    };
    let mut engine = Engine::new(graph);

    let terms: Vec<&str> = query.split_whitespace().collect();
    match terms.as_slice() {
        [] => eprintln!("{} Empty query", "✗".red().bold()),
        [term] => {
            let matches = engine.search(term, 10);
            if matches.is_empty() {
                println!("No nodes match '{}'", term);
                return;
            }
            println!("{} matches for '{}':", matches.len(), term);
            for result in matches {
                let label = engine
                    .graph()
                    .node(&result.id)
                    .map(|node| node.label.clone())
                    .unwrap_or_else(|| result.id.clone());
                println!("  {:>5}  {}", result.score, label);
            }
        }
        [term_a, term_b, rest @ ..] => {
            if !rest.is_empty() {
                eprintln!(
                    "{} Using first two terms, ignoring {} more",
                    "!".yellow().bold(),
                    rest.len()
                );
            }
            let visible = engine.compute_visible_graph(&ProtectedSeed::default(), perspective);
            let path = engine.two_term_path(&visible, term_a, term_b);
            if path.is_empty() {
                println!(
                    "No visible path connects '{}' and '{}'",
                    term_a, term_b
                );
                return;
            }
            println!("Shortest visible path ({} hops):", path.len() - 1);
            for (index, id) in path.iter().enumerate() {
                let label = engine
                    .graph()
                    .node(id)
                    .map(|node| node.label.clone())
                    .unwrap_or_else(|| id.clone());
                if index == 0 {
                    println!("  {}", label.bright_white());
                } else {
                    println!("  {} {}", "→".cyan(), label);
                }
            }
        }
    }
}
