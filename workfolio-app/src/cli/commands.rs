use crate::api::server as api_server;
use crate::cli::opts::*;

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use workfolio_core::{NewWork, Repository, WorkPatch};
use workfolio_json::{paths, JsonStore, StoreLayout};

pub async fn run_cli(args: Cli) -> Result<()> {
    let layout = resolve_layout(&args);
    match args.cmd.clone() {
        Command::Paths => {
            print_layout(&layout);
            Ok(())
        }
        Command::Serve(cmd) => {
            let addr: SocketAddr = cmd.addr.parse()?;
            let repo = open_repo(layout.clone()).await?;
            info!(
                environment = %args.environment,
                server_url = %cmd.api_url,
                uploads_path = %layout.uploads_dir.display(),
                data_path = %layout.data_dir.display(),
                "starting api"
            );
            api_server::run(repo, addr).await
        }
        Command::Work(cmd) => {
            let repo = open_repo(layout).await?;
            work_cmd(repo, cmd).await
        }
        Command::Upload { path } => {
            let repo = open_repo(layout).await?;
            upload_cmd(repo, &path).await
        }
    }
}

pub fn resolve_layout(args: &Cli) -> StoreLayout {
    let base = args
        .base_dir
        .clone()
        .unwrap_or_else(|| paths::base_dir(args.is_production()));
    paths::resolve_with(base, &args.data_dir, &args.upload_dir)
}

pub async fn open_repo(layout: StoreLayout) -> Result<Arc<dyn Repository>> {
    let opened = JsonStore::open(layout).await?;
    if let Some(e) = opened.load_error {
        warn!(error = %e, "continuing with an empty collection");
    }
    Ok(Arc::new(opened.store))
}

fn print_layout(layout: &StoreLayout) {
    println!("base\t{}", layout.base_dir.display());
    println!("data\t{}", layout.data_dir.display());
    println!("uploads\t{}", layout.uploads_dir.display());
    println!("db\t{}", layout.db_file.display());
}

async fn work_cmd(repo: Arc<dyn Repository>, cmd: WorkCmd) -> Result<()> {
    match cmd {
        WorkCmd::List => {
            for w in repo.list_works().await? {
                println!("{}\t{}\t{}\tvisible={}", w.id, w.title, w.image_url, w.is_visible);
            }
        }
        WorkCmd::Show { id } => {
            let w = repo.get_work(id).await?;
            println!("{}", serde_json::to_string_pretty(&w)?);
        }
        WorkCmd::Add(a) => {
            let new = NewWork {
                title: a.title,
                description: a.description,
                image_url: a.image_url,
                client_url: a.client_url,
                is_visible: !a.hidden,
            };
            let w = repo.create_work(new).await?;
            println!("{}", w.id);
        }
        WorkCmd::Edit(e) => {
            let patch = edit_patch(e.clone())?;
            repo.update_work(e.id, patch).await?;
            println!("ok");
        }
        WorkCmd::Rm { id } => {
            repo.remove_work(id).await?;
            println!("ok");
        }
    }
    Ok(())
}

fn edit_patch(e: WorkEdit) -> Result<WorkPatch> {
    let is_visible = match (e.visible, e.hidden) {
        (true, true) => bail!("cannot use --visible and --hidden together"),
        (true, false) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    };
    let patch = WorkPatch {
        title: e.title,
        description: e.description,
        image_url: e.image_url,
        client_url: e.client_url,
        is_visible,
    };
    if patch.is_empty() {
        bail!("nothing to change");
    }
    Ok(patch)
}

async fn upload_cmd(repo: Arc<dyn Repository>, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let reference = repo.store_uploaded_image(&bytes, name).await?;
    println!("{reference}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn layout_honours_overrides() {
        let args = Cli::try_parse_from([
            "workfolio", "--base-dir", "/srv/folio", "--data-dir", "state", "paths",
        ])
        .unwrap();
        let l = resolve_layout(&args);
        assert_eq!(l.db_file, PathBuf::from("/srv/folio/state/works.json"));
        assert_eq!(l.uploads_dir, PathBuf::from("/srv/folio/uploads"));
    }

    #[test]
    fn edit_flags() {
        let args = Cli::try_parse_from(["workfolio", "work", "edit", "3", "--hidden"]).unwrap();
        let Command::Work(WorkCmd::Edit(e)) = args.cmd else { panic!("expected edit") };
        let patch = edit_patch(e).unwrap();
        assert_eq!(patch.is_visible, Some(false));
        assert!(!patch.touches_required());

        let args = Cli::try_parse_from(["workfolio", "work", "edit", "3"]).unwrap();
        let Command::Work(WorkCmd::Edit(e)) = args.cmd else { panic!("expected edit") };
        assert!(edit_patch(e).is_err());

        let args =
            Cli::try_parse_from(["workfolio", "work", "edit", "3", "--visible", "--hidden"]).unwrap();
        let Command::Work(WorkCmd::Edit(e)) = args.cmd else { panic!("expected edit") };
        assert!(edit_patch(e).is_err());
    }

    #[tokio::test]
    async fn upload_lands_in_uploads_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layout = paths::resolve_in(dir.path());
        let repo = open_repo(layout.clone()).await.unwrap();

        let src = dir.path().join("shot.png");
        std::fs::write(&src, b"png").unwrap();
        upload_cmd(repo.clone(), &src).await.unwrap();

        let stored: Vec<_> = std::fs::read_dir(&layout.uploads_dir).unwrap().collect();
        assert_eq!(stored.len(), 1);
    }
}
