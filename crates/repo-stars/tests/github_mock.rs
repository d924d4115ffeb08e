use mockito::Server;
use repo_stars::data_model::{ChatMessage, FunctionCall, MessageRole, ToolCall};
use repo_stars::github::{GithubErr, RatingCheck, RepoRating, StarDecision, GITHUB_ACCEPT};
use repo_stars::tools::{execute_function_call, function_message, ToolOutput, GET_REPO_RATINGS};
use repo_stars::GithubClient;

async fn repo_mock(server: &mut Server, path: &str, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("GET", path)
        .match_header("accept", GITHUB_ACCEPT)
        .match_header("user-agent", mockito::Matcher::Regex("^repo-stars/".into()))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn rated_above_threshold() {
    let mut server = Server::new_async().await;
    let mock = repo_mock(
        &mut server,
        "/repos/octocat/Hello-World",
        200,
        r#"{"id": 1296269, "stargazers_count": 42}"#,
    )
    .await;

    let github = GithubClient::new(server.url(), 10).unwrap();
    let check = github
        .check_repo_rating("octocat/Hello-World")
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(
        check,
        RatingCheck::Rated {
            rating: RepoRating {
                owner: "octocat".into(),
                repo: "Hello-World".into(),
                stars: 42,
            },
            threshold: 10,
        }
    );
    assert_eq!(check.decision(), Some(StarDecision::AddStar));
    let report = check.to_string();
    assert!(report.contains("has 42 stars"));
    assert!(report.contains("Since the repository has more than 10 stars, I would add a star."));
}

#[tokio::test]
async fn boundary_is_not_starred() {
    let mut server = Server::new_async().await;
    let _mock = repo_mock(&mut server, "/repos/a/b", 200, r#"{"stargazers_count": 10}"#).await;

    let github = GithubClient::new(server.url(), 10).unwrap();
    let check = github.check_repo_rating("a/b").await.unwrap();
    assert_eq!(check.decision(), Some(StarDecision::NoStar));
    assert!(check
        .to_string()
        .contains("doesn't meet the threshold of 10 stars, so no star would be added."));
}

#[tokio::test]
async fn not_found() {
    let mut server = Server::new_async().await;
    let mock = repo_mock(
        &mut server,
        "/repos/dexstakker/scrabbler",
        404,
        r#"{"message": "Not Found"}"#,
    )
    .await;

    let github = GithubClient::new(server.url(), 10).unwrap();
    let check = github
        .check_repo_rating("dexstakker/scrabbler")
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(check.decision(), None);
    let report = check.to_string();
    assert!(report.contains("Failed to fetch data"));
    assert!(report.contains("404"));
}

#[tokio::test]
async fn malformed_name_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let github = GithubClient::new(server.url(), 10).unwrap();
    let err = github.check_repo_rating("llama_index").await.unwrap_err();
    assert!(matches!(err, GithubErr::InvalidRepoName(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn dispatch_round_trip() {
    let mut server = Server::new_async().await;
    let _mock = repo_mock(
        &mut server,
        "/repos/run-llama/llama_index",
        200,
        r#"{"stargazers_count": 35000}"#,
    )
    .await;
    let github = GithubClient::new(server.url(), 10).unwrap();

    let call = ToolCall {
        id: "call_abc".into(),
        kind: "function".into(),
        function: FunctionCall {
            name: GET_REPO_RATINGS.into(),
            arguments: r#"{"repo_name": "run-llama/llama_index"}"#.into(),
        },
    };
    let assistant = ChatMessage {
        role: MessageRole::Assistant,
        tool_calls: vec![call.clone()],
        ..Default::default()
    };

    let output = execute_function_call(&assistant, &github).await.unwrap();
    assert!(matches!(output, ToolOutput::Rating(_)));

    let msg = function_message(&call, &output);
    assert_eq!(msg.role, MessageRole::Function);
    assert_eq!(msg.tool_call_id.as_deref(), Some("call_abc"));
    assert_eq!(msg.name.as_deref(), Some(GET_REPO_RATINGS));
    assert!(msg
        .content
        .unwrap()
        .starts_with("The repository run-llama/llama_index has 35000 stars."));
}
