use crate::config::{Context, Ports, DEFAULT_PROD_IP, DEV_HOST};
use crate::docker::{self, DockerMeta};
use crate::env::{self, PRODUCTION_IP_KEY};
use crate::ip::DeployIp;
use crate::profile::{Profile, Target};
use anyhow::{bail, Result};
use std::io::{self, Write};
use std::process::ExitCode;

const SUCCESS: ExitCode = ExitCode::SUCCESS;

/// Deploy the dev profile. Dev always targets localhost; an IP argument is
/// rejected rather than silently ignored.
pub async fn dev(ctx: &Context, ip: Option<String>) -> Result<ExitCode> {
    if let Some(ip) = ip {
        bail!(
            "the dev profile does not accept an IP address (got '{ip}'); \
             dev always deploys to localhost. For a custom IP use: coesi prod [IP]"
        );
    }
    deploy(ctx, Profile::Dev, None).await
}

/// Deploy the prod profile, optionally rewriting PRODUCTION_IP first.
pub async fn prod(ctx: &Context, ip: Option<String>) -> Result<ExitCode> {
    let ip = ip.as_deref().map(str::parse::<DeployIp>).transpose()?;
    deploy(ctx, Profile::Prod, ip).await
}

async fn deploy(ctx: &Context, profile: Profile, ip: Option<DeployIp>) -> Result<ExitCode> {
    let meta = detect(ctx).await?;

    let env_file = profile.env_file(&ctx.root);
    env::validate_env(&env_file)?;

    if let Some(ip) = ip {
        env::update_env_file(&env_file, PRODUCTION_IP_KEY, &ip.to_string())?;
    }
    env::load_env(&ctx.root, profile)?;

    let host = match profile {
        Profile::Dev => DEV_HOST.to_string(),
        Profile::Prod => match ip {
            Some(ip) => ip.to_string(),
            None => std::env::var(PRODUCTION_IP_KEY)
                .unwrap_or_else(|_| DEFAULT_PROD_IP.to_string()),
        },
    };
    let ports = Ports::from_env();

    println!("=== Deploying COESI Platform ===");
    println!("Profile: {profile}");
    println!("Deploy IP: {host}");
    println!();

    println!("Stopping existing containers...");
    let code = docker::compose(&meta, &ctx.root, profile.as_str(), &["down"]).await?;
    if code != 0 {
        return Ok(exit_from(code));
    }

    println!("Building and starting services...");
    let code = docker::compose(
        &meta,
        &ctx.root,
        profile.as_str(),
        &["up", "--build", "-d"],
    )
    .await?;
    if code != 0 {
        return Ok(exit_from(code));
    }

    println!();
    println!("=== Deployment Status ===");
    print_services(&meta, ctx, profile).await;

    println!();
    println!("=== Services Available At ===");
    for (service, url) in ports.service_urls(&host) {
        println!("  {service:<16} {url}");
    }

    Ok(SUCCESS)
}

/// Restart services without rebuilding; fans out over `all`.
pub async fn restart(ctx: &Context, target: Target) -> Result<ExitCode> {
    let meta = detect(ctx).await?;
    let mut failed = false;

    for &profile in target.profiles() {
        println!("=== Restarting COESI Platform ({profile}) ===");
        if let Err(e) = restart_one(ctx, &meta, profile).await {
            eprintln!("Error restarting {profile}: {e:#}");
            failed = true;
        }
    }
    Ok(batch_exit(failed))
}

async fn restart_one(ctx: &Context, meta: &DockerMeta, profile: Profile) -> Result<()> {
    env::validate_env(&profile.env_file(&ctx.root))?;
    env::load_env(&ctx.root, profile)?;

    let code = docker::compose(meta, &ctx.root, profile.as_str(), &["restart"]).await?;
    if code != 0 {
        bail!("docker compose restart exited with code {code}");
    }
    print_services(meta, ctx, profile).await;
    Ok(())
}

/// Stop services for the profile(s) with `compose down`.
pub async fn stop(ctx: &Context, target: Target) -> Result<ExitCode> {
    let meta = detect(ctx).await?;
    let mut failed = false;

    for &profile in target.profiles() {
        println!("Stopping {profile} services...");
        match docker::compose(&meta, &ctx.root, profile.as_str(), &["down"]).await {
            Ok(0) => {}
            Ok(code) => {
                eprintln!("Error stopping {profile}: docker compose exited with code {code}");
                failed = true;
            }
            Err(e) => {
                eprintln!("Error stopping {profile}: {e:#}");
                failed = true;
            }
        }
    }

    if !failed {
        println!("Services stopped.");
    }
    Ok(batch_exit(failed))
}

/// Show the state of each profile's services.
pub async fn status(ctx: &Context, target: Target) -> Result<ExitCode> {
    let meta = detect(ctx).await?;
    let mut failed = false;

    for &profile in target.profiles() {
        println!("=== {profile} services ===");
        match docker::compose_ps(&meta, &ctx.root, profile.as_str()).await {
            Ok(services) => print_service_rows(&services),
            Err(e) => {
                eprintln!("Error getting {profile} status: {e:#}");
                failed = true;
            }
        }
        println!();
    }
    Ok(batch_exit(failed))
}

/// Stream or dump service logs.
pub async fn logs(ctx: &Context, service: Option<String>, follow: bool) -> Result<ExitCode> {
    let meta = detect(ctx).await?;

    match &service {
        Some(s) => println!("Showing logs for service: {s}"),
        None => println!("Showing logs for all services..."),
    }

    let mut args = vec!["logs"];
    if follow {
        args.push("-f");
    }
    if let Some(s) = &service {
        args.push(s);
    }

    let code = docker::compose_plain(&meta, &ctx.root, &args).await?;
    Ok(exit_from(code))
}

/// Remove containers, networks and volumes; `all` also prunes the docker
/// system. Asks for confirmation unless forced.
pub async fn clean(ctx: &Context, target: Target, force: bool) -> Result<ExitCode> {
    let meta = detect(ctx).await?;

    if !force {
        println!("Cleaning {target} environment(s).");
        println!("This removes containers, networks and volumes.");
        if !confirm("Are you sure?")? {
            println!("Clean operation cancelled.");
            return Ok(SUCCESS);
        }
    }

    let mut failed = false;
    for &profile in target.profiles() {
        let code = docker::compose(
            &meta,
            &ctx.root,
            profile.as_str(),
            &["down", "-v", "--remove-orphans"],
        )
        .await;
        match code {
            Ok(0) => {}
            Ok(code) => {
                eprintln!("Error cleaning {profile}: docker compose exited with code {code}");
                failed = true;
            }
            Err(e) => {
                eprintln!("Error cleaning {profile}: {e:#}");
                failed = true;
            }
        }
    }

    if target == Target::All {
        if let Err(e) = docker::system_prune(&meta, &ctx.root).await {
            tracing::warn!("docker system prune failed: {e:#}");
        }
    }

    if !failed {
        println!("{target} environment(s) cleaned.");
    }
    Ok(batch_exit(failed))
}

/// Rewrite PRODUCTION_IP in the prod env file without deploying.
pub fn set_ip(ctx: &Context, address: &str) -> Result<ExitCode> {
    let ip: DeployIp = address.parse()?;
    let env_file = Profile::Prod.env_file(&ctx.root);
    env::update_env_file(&env_file, PRODUCTION_IP_KEY, &ip.to_string())?;

    println!("Production IP updated to: {ip}");
    println!("Run 'coesi prod' to deploy with the new IP");
    Ok(SUCCESS)
}

async fn detect(ctx: &Context) -> Result<DockerMeta> {
    let meta = DockerMeta::detect(&ctx.root, &ctx.docker_bin).await;
    meta.ensure_available()?;
    Ok(meta)
}

async fn print_services(meta: &DockerMeta, ctx: &Context, profile: Profile) {
    match docker::compose_ps(meta, &ctx.root, profile.as_str()).await {
        Ok(services) => print_service_rows(&services),
        Err(e) => eprintln!("Could not list services: {e:#}"),
    }
}

fn print_service_rows(services: &[docker::ComposeService]) {
    if services.is_empty() {
        println!("  (no services)");
        return;
    }
    let width = services.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for s in services {
        println!("  {:<width$}  {:<10}  {}", s.name, s.state, s.status);
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn exit_from(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn batch_exit(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        SUCCESS
    }
}
