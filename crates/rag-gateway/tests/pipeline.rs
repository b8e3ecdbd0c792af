//! End-to-end pipeline tests against fake backends

mod common;

use common::{chunk, doc, pipeline, FakeCompletion, FakeSearch};
use futures_util::StreamExt;
use std::sync::Arc;

use rag_gateway::{
    generation::prompt::{CONTEXT_ACKNOWLEDGEMENT, CONTEXT_INTRO},
    relay::{Frame, RelayState},
    types::{ChatCompletionChunk, ChatMessage, ChatRequest, ChatRole, SearchHits},
    ChatOutcome, Error, RetrievalError,
};

fn conversation(stream: bool) -> ChatRequest {
    ChatRequest::new(
        "mpt-7b",
        vec![
            ChatMessage::system("You are a helpful assistant."),
            ChatMessage::user("How do I reset my password?"),
        ],
    )
    .with_stream(stream)
}

async fn collect(outcome: ChatOutcome) -> Vec<Frame> {
    match outcome {
        ChatOutcome::Stream(relay) => relay.into_frames().collect().await,
        ChatOutcome::Completion(_) => panic!("expected a stream"),
    }
}

#[tokio::test]
async fn test_one_document_above_threshold() {
    let search = FakeSearch::returning(vec![doc("A", "s1", 5.0), doc("B", "s2", 1.0)]);
    let completion = Arc::new(FakeCompletion::new());
    let pipeline = pipeline(search.clone(), completion.clone(), 3.0);

    let prepared = pipeline.prepare(conversation(false)).await.unwrap();

    assert_eq!(prepared.documents, 1);
    assert_eq!(prepared.citations, "s1");
    assert_eq!(prepared.request.messages.len(), 4);
    assert_eq!(prepared.request.messages[0].role, ChatRole::System);
    assert_eq!(prepared.request.messages[1].role, ChatRole::User);
    assert_eq!(prepared.request.messages[1].content, format!("{}\n\nA", CONTEXT_INTRO));
    assert_eq!(prepared.request.messages[2].role, ChatRole::Assistant);
    assert_eq!(prepared.request.messages[2].content, CONTEXT_ACKNOWLEDGEMENT);
    assert_eq!(prepared.request.messages[3].content, "How do I reset my password?");

    let queries = search.queries.lock().unwrap().clone();
    assert_eq!(queries, vec![("How do I reset my password?".to_string(), 2)]);
}

#[tokio::test]
async fn test_nothing_above_threshold_forwards_unchanged() {
    let search = FakeSearch::returning(vec![doc("A", "s1", 2.0), doc("B", "s2", 1.0)]);
    let completion = Arc::new(FakeCompletion::new());
    let pipeline = pipeline(search, completion.clone(), 3.0);

    let request = conversation(false);
    let outcome = pipeline.chat(request.clone()).await.unwrap();

    match outcome {
        ChatOutcome::Completion(body) => {
            assert_eq!(
                body.as_ref(),
                br#"{"id":"chatcmpl-1","object":"chat.completion","choices":[]}"#
            );
        }
        ChatOutcome::Stream(_) => panic!("expected a completion"),
    }
    assert_eq!(completion.last_request(), request);
}

#[tokio::test]
async fn test_unscored_rows_forward_unchanged() {
    let search = FakeSearch::returning_hits(SearchHits::new(1, Vec::new()));
    let completion = Arc::new(FakeCompletion::new());
    let pipeline = pipeline(search, completion.clone(), 3.0);

    let request = conversation(false);
    let prepared = pipeline.prepare(request.clone()).await.unwrap();

    assert_eq!(prepared.documents, 0);
    assert_eq!(prepared.citations, "");
    assert_eq!(prepared.request, request);
}

#[tokio::test]
async fn test_extra_request_fields_survive() {
    let search = FakeSearch::returning(vec![doc("A", "s1", 5.0)]);
    let completion = Arc::new(FakeCompletion::new());
    let pipeline = pipeline(search, completion.clone(), 3.0);

    let request = conversation(false).with_extra("temperature", serde_json::json!(0.2));
    pipeline.chat(request).await.unwrap();

    let forwarded = completion.last_request();
    assert_eq!(forwarded.extra.get("temperature"), Some(&serde_json::json!(0.2)));
    assert_eq!(forwarded.model, "mpt-7b");
}

#[tokio::test]
async fn test_stream_with_sentinel_sends_citations() {
    let search = FakeSearch::returning(vec![doc("A", "s1", 5.0), doc("B", "s2", 4.0)]);
    let completion = Arc::new(FakeCompletion::new().with_chunks(vec![
        chunk("c1", "Hel"),
        chunk("c1", "lo"),
        chunk("", ""),
        chunk("c1", "never relayed"),
    ]));
    let pipeline = pipeline(search, completion, 3.0);

    let frames = collect(pipeline.chat(conversation(true)).await.unwrap()).await;

    // N chunks, the citation trailer, then the marker
    assert_eq!(frames.len(), 4);
    assert!(matches!(frames[0], Frame::Chunk(_)));
    assert!(frames[0].payload().contains("Hel"));
    assert!(frames[1].payload().contains("lo"));

    let trailer: ChatCompletionChunk = match &frames[2] {
        Frame::Citations(payload) => serde_json::from_str(payload).unwrap(),
        other => panic!("expected citations, got {:?}", other),
    };
    assert_eq!(trailer.model, "mpt-7b");
    assert_eq!(trailer.object, "chat.completion");
    assert_eq!(trailer.choices.len(), 1);
    assert_eq!(trailer.choices[0].delta.content, "s1\ns2");

    assert_eq!(frames[3], Frame::Done);
}

#[tokio::test]
async fn test_stream_end_without_sentinel_sends_done_only() {
    let search = FakeSearch::returning(vec![doc("A", "s1", 5.0)]);
    let completion =
        Arc::new(FakeCompletion::new().with_chunks(vec![chunk("c1", "Hel"), chunk("c1", "lo")]));
    let pipeline = pipeline(search, completion, 3.0);

    let frames = collect(pipeline.chat(conversation(true)).await.unwrap()).await;

    assert_eq!(frames.len(), 3);
    assert!(frames[..2].iter().all(|f| matches!(f, Frame::Chunk(_))));
    assert_eq!(frames[2], Frame::Done);
}

#[tokio::test]
async fn test_stream_without_documents_sends_empty_trailer() {
    let search = FakeSearch::returning(vec![doc("A", "s1", 1.0)]);
    let completion =
        Arc::new(FakeCompletion::new().with_chunks(vec![chunk("c1", "Hi"), chunk("", "")]));
    let pipeline = pipeline(search, completion, 3.0);

    let frames = collect(pipeline.chat(conversation(true)).await.unwrap()).await;

    assert_eq!(frames.len(), 3);
    let trailer: ChatCompletionChunk = serde_json::from_str(frames[1].payload()).unwrap();
    assert_eq!(trailer.choices[0].delta.content, "");
    assert_eq!(frames[2], Frame::Done);
}

#[tokio::test]
async fn test_stream_relay_state_after_done() {
    let search = FakeSearch::returning(vec![doc("A", "s1", 5.0)]);
    let completion = Arc::new(FakeCompletion::new().with_chunks(vec![chunk("", "")]));
    let pipeline = pipeline(search, completion, 3.0);

    let mut relay = match pipeline.chat(conversation(true)).await.unwrap() {
        ChatOutcome::Stream(relay) => relay,
        ChatOutcome::Completion(_) => panic!("expected a stream"),
    };

    assert!(matches!(relay.next_frame().await, Some(Frame::Citations(_))));
    assert!(!relay.holds_backend());
    assert_eq!(relay.next_frame().await, Some(Frame::Done));
    assert_eq!(relay.state(), RelayState::Done);
    assert_eq!(relay.next_frame().await, None);
}

#[tokio::test]
async fn test_retrieval_failure_skips_completion() {
    let search =
        FakeSearch::failing(RetrievalError::BackendUnavailable("connection refused".into()));
    let completion = Arc::new(FakeCompletion::new());
    let pipeline = pipeline(search, completion.clone(), 3.0);

    let err = pipeline.chat(conversation(false)).await.err().unwrap();
    assert!(matches!(
        err,
        Error::Retrieval(RetrievalError::BackendUnavailable(_))
    ));
    assert!(completion.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_no_data_is_an_error() {
    let search = FakeSearch::returning(Vec::new());
    let completion = Arc::new(FakeCompletion::new());
    let pipeline = pipeline(search, completion.clone(), 3.0);

    let err = pipeline.chat(conversation(true)).await.err().unwrap();
    assert!(matches!(err, Error::Retrieval(RetrievalError::NoData)));
    assert!(completion.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_conversation_rejected() {
    let search = FakeSearch::returning(vec![doc("A", "s1", 5.0)]);
    let completion = Arc::new(FakeCompletion::new());
    let pipeline = pipeline(search.clone(), completion, 3.0);

    let err = pipeline
        .chat(ChatRequest::new("mpt-7b", Vec::new()))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, Error::InvalidRequest(_)));
    assert!(search.queries.lock().unwrap().is_empty());
}
