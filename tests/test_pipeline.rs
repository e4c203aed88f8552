use std::io::Cursor;

use flavorai::bedrock::BedrockClient;
use flavorai::{AnalysisRequest, AppConfig, FlavorError, FlavorPipeline, Media, VideoFormat};
use image::{DynamicImage, ImageFormat, RgbImage};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const EXTRACT_PATH: &str = "/model/amazon.nova-pro-v1:0/invoke";
const RECIPE_PATH: &str = "/model/amazon.nova-lite-v1:0/invoke";

fn model_reply(text: &str) -> String {
    json!({
        "output": {"message": {"role": "assistant", "content": [{"text": text}]}},
        "stopReason": "end_turn",
        "usage": {"inputTokens": 1500, "outputTokens": 42, "totalTokens": 1542}
    })
    .to_string()
}

fn jpeg_photo() -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 12, image::Rgb([220, 120, 40])));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

fn pipeline_for(server: &ServerGuard) -> FlavorPipeline {
    let client = BedrockClient::with_base_url("test-token", server.url());
    FlavorPipeline::with_client(&AppConfig::default(), client).unwrap()
}

#[tokio::test]
async fn test_image_to_recipe() {
    let mut server = Server::new_async().await;
    let extract = server
        .mock("POST", EXTRACT_PATH)
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJson(json!({
            "messages": [{"role": "user", "content": [{"image": {"format": "jpeg"}}]}],
            "inferenceConfig": {"max_new_tokens": 2048, "top_k": 20}
        })))
        .with_status(200)
        .with_body(model_reply("## Identified Ingredients\n- Tomato: 3\n- Basil: 1 bunch"))
        .expect(1)
        .create_async()
        .await;
    let recipe = server
        .mock("POST", RECIPE_PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("Tomato: 3".to_string()),
            Matcher::Regex("Additional preferences: no garlic".to_string()),
        ]))
        .with_status(200)
        .with_body(model_reply("**Tomato Basil Salad**\n\nServes 2"))
        .expect(1)
        .create_async()
        .await;

    let media = Media::image_from_bytes(&jpeg_photo()).unwrap();
    let analysis = pipeline_for(&server)
        .analyze(Some(&media), Some("no garlic"))
        .await
        .unwrap();

    assert_eq!(
        analysis.ingredients,
        "### Ingredients (detected from image)\n## Identified Ingredients\n- Tomato: 3\n- Basil: 1 bunch"
    );
    assert_eq!(analysis.recipe, "**Tomato Basil Salad**\n\nServes 2");
    extract.assert_async().await;
    recipe.assert_async().await;
}

#[tokio::test]
async fn test_video_uses_video_block_and_params() {
    let mut server = Server::new_async().await;
    let extract = server
        .mock("POST", EXTRACT_PATH)
        .match_body(Matcher::PartialJson(json!({
            "messages": [{"content": [{"video": {"format": "mp4", "source": {"bytes": "ZmFrZS1tcDQ="}}}]}],
            "inferenceConfig": {"max_new_tokens": 300}
        })))
        .with_status(200)
        .with_body(model_reply("- Onion: 2"))
        .create_async()
        .await;

    let media = Media::video(b"fake-mp4".to_vec(), VideoFormat::Mp4).unwrap();
    let ingredients = pipeline_for(&server)
        .extract_ingredients(Some(&media))
        .await
        .unwrap();

    assert_eq!(ingredients, "### Ingredients (detected from video)\n- Onion: 2");
    extract.assert_async().await;
}

#[tokio::test]
async fn test_missing_text_field_becomes_error_pane() {
    let mut server = Server::new_async().await;
    let _extract = server
        .mock("POST", EXTRACT_PATH)
        .with_status(200)
        .with_body(r#"{"output": {"message": {"content": [{"reasoningContent": {}}]}}}"#)
        .create_async()
        .await;
    let recipe = server
        .mock("POST", RECIPE_PATH)
        .expect(0)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server);
    let media = Media::image_from_bytes(&jpeg_photo()).unwrap();

    let typed = pipeline.extract_ingredients(Some(&media)).await;
    assert!(matches!(typed, Err(FlavorError::MalformedResponse(_))));

    let analysis = pipeline
        .process(AnalysisRequest {
            media: Some(media),
            ..Default::default()
        })
        .await;
    assert!(analysis
        .ingredients
        .starts_with("### Error\nError processing image: Unexpected model response format"));
    assert!(analysis.recipe.starts_with("### Error"));
    recipe.assert_async().await;
}

#[tokio::test]
async fn test_throttling_is_a_transport_error() {
    let mut server = Server::new_async().await;
    let _extract = server
        .mock("POST", EXTRACT_PATH)
        .with_status(429)
        .with_body(r#"{"message": "Too many requests, please wait before trying again."}"#)
        .create_async()
        .await;

    let media = Media::image_from_bytes(&jpeg_photo()).unwrap();
    let err = pipeline_for(&server)
        .extract_ingredients(Some(&media))
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn test_no_media_never_calls_the_service() {
    let mut server = Server::new_async().await;
    let any_call = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server);
    let analysis = pipeline
        .process(AnalysisRequest {
            media: None,
            preferences: Some("vegan".to_string()),
            cached_ingredients: None,
        })
        .await;

    assert_eq!(analysis.ingredients, "### Error\nNo media provided");
    assert!(matches!(
        pipeline.analyze(None, None).await,
        Err(FlavorError::NoMedia)
    ));
    any_call.assert_async().await;
}

#[tokio::test]
async fn test_cached_ingredients_only_call_recipe_model() {
    let mut server = Server::new_async().await;
    let extract = server
        .mock("POST", EXTRACT_PATH)
        .expect(0)
        .create_async()
        .await;
    let recipe = server
        .mock("POST", RECIPE_PATH)
        .match_body(Matcher::Regex("Additional preferences: make it spicy".to_string()))
        .with_status(200)
        .with_body(model_reply("**Spicy Shakshuka**"))
        .expect(1)
        .create_async()
        .await;

    let analysis = pipeline_for(&server)
        .process(AnalysisRequest {
            media: None,
            preferences: Some("make it spicy".to_string()),
            cached_ingredients: Some("### Ingredients (detected from image)\n- Eggs: 4".to_string()),
        })
        .await;

    assert_eq!(analysis.recipe, "**Spicy Shakshuka**");
    extract.assert_async().await;
    recipe.assert_async().await;
}
