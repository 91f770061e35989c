use gym_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment();

    print_banner();

    tracing::info!("Gym server starting...");

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 初始化状态（建库、迁移）
    let state = ServerState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    server.run().await?;

    Ok(())
}
