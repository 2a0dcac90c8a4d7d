use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use todostore::cli::{Cli, Command};
use todostore::config::Config;
use todostore::task::{ListFilter, Task, filter_tasks, search_tasks};
use todostore::{TaskStore, TodoList};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn print_tasks(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks");
        return;
    }
    for task in tasks {
        let marker = if task.complete { "[x]".green() } else { "[ ]".normal() };
        let title = if task.complete {
            task.title.dimmed()
        } else {
            task.title.normal()
        };
        if task.description.is_empty() {
            println!("{} {} {}", marker, task.id.yellow(), title);
        } else {
            println!("{} {} {} - {}", marker, task.id.yellow(), title, task.description.dimmed());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("todostore starting");

    let store = TaskStore::open(&config.store_path)?;
    let window = std::time::Duration::from_millis(config.quiescence_ms);
    let mut list = TodoList::with_quiescence(store, window);

    match cli.command {
        Command::Add { title, description } => {
            let task = Task::new(title, description);
            let id = task.id.clone();
            list.add(task);
            println!("{} Added task: {}", "✓".green(), id.cyan());
        }
        Command::List { filter, search } => {
            let filter: ListFilter = filter.into();
            let tasks = list.current();
            let visible = match search {
                Some(query) => search_tasks(tasks, &query)
                    .into_iter()
                    .filter(|t| filter.matches(t))
                    .collect(),
                None => filter_tasks(tasks, filter),
            };
            print_tasks(&visible);
        }
        Command::Edit { id, title, description } => {
            let Some(existing) = list.current().iter().find(|t| t.id == id).cloned() else {
                println!("{} No task with id: {}", "✗".red(), id);
                return Ok(());
            };
            let updated = Task {
                title: title.unwrap_or(existing.title),
                description: description.unwrap_or(existing.description),
                ..existing
            };
            list.update(updated);
            println!("{} Updated task: {}", "✓".green(), id.cyan());
        }
        Command::Done { id } => {
            list.mark_complete(&id);
            println!("{} Marked complete: {}", "✓".green(), id.cyan());
        }
        Command::Undone { id } => {
            list.mark_incomplete(&id);
            println!("{} Marked incomplete: {}", "✓".green(), id.cyan());
        }
        Command::Toggle { id } => {
            list.toggle_complete(&id);
            println!("{} Toggled: {}", "✓".green(), id.cyan());
        }
        Command::Rm { id } => {
            list.delete(&id);
            println!("{} Deleted task: {}", "✓".green(), id.cyan());
        }
        Command::Mv { id, position } => {
            // Reorder is computed on the caller's side; the core only sees
            // the full list in its new order.
            let mut tasks: Vec<Task> = list.current().to_vec();
            let Some(from) = tasks.iter().position(|t| t.id == id) else {
                println!("{} No task with id: {}", "✗".red(), id);
                return Ok(());
            };
            let task = tasks.remove(from);
            let to = position.min(tasks.len());
            tasks.insert(to, task);
            list.set_all(tasks);
            println!("{} Moved task: {}", "✓".green(), id.cyan());
        }
    }

    // The write is debounced; make sure it lands before the process exits
    list.flush().await?;

    Ok(())
}
