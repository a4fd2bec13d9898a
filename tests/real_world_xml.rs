//! Integration tests converting real-world XML formats.
//!
//! These serve as smoke tests ensuring the converter handles common patterns
//! found in Atom feeds, RSS, SVG, Maven POMs, and Android manifests, and that
//! each document survives a serialize and re-parse cycle unchanged.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use xmldict::{parse_str, to_xml, DocumentMap, Value};

fn parse_and_roundtrip(input: &str) -> DocumentMap {
    let map = parse_str(input).unwrap_or_else(|e| panic!("parse failed: {e}"));
    // Roundtrip: serialize and re-parse
    let output = to_xml(&map);
    let map2 = parse_str(&output).unwrap_or_else(|e| panic!("roundtrip parse failed: {e}"));
    assert_eq!(map, map2, "document map changed after roundtrip:\n{output}");
    map
}

// --- Atom / RSS ---

#[test]
fn test_atom_feed() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Feed</title>
  <link href="http://example.org/"/>
  <updated>2025-12-13T18:30:02Z</updated>
  <author>
    <name>John Doe</name>
  </author>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <entry>
    <title>Atom-Powered Robots Run Amok</title>
    <link href="http://example.org/2003/12/13/atom03"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <updated>2025-12-13T18:30:02Z</updated>
    <summary>Some text.</summary>
  </entry>
</feed>"#;

    let map = parse_and_roundtrip(xml);
    assert_eq!(map.node_name(), Some("feed"));
    assert_eq!(map.attribute_for_key("xmlns"), Some("http://www.w3.org/2005/Atom"));
    assert_eq!(map["title"], "Example Feed");
    assert_eq!(map["link"]["_href"], "http://example.org/");
    assert_eq!(map.value_for_key_path("author.name").unwrap(), "John Doe");
    assert_eq!(
        map.string_value_for_key_path("entry.summary").unwrap(),
        "Some text."
    );
}

#[test]
fn test_rss_feed() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>News</title>
    <link>https://example.com/</link>
    <item>
      <title>First &amp; foremost</title>
      <guid isPermaLink="false">a1</guid>
    </item>
    <item>
      <title>Second</title>
      <guid isPermaLink="false">a2</guid>
    </item>
    <item>
      <title>Third</title>
      <guid isPermaLink="false">a3</guid>
    </item>
  </channel>
</rss>"#;

    let map = parse_and_roundtrip(xml);
    assert_eq!(map["_version"], "2.0");
    let items = map.array_value_for_key_path("channel.item").unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["title"], "First & foremost");
    assert_eq!(items[2]["guid"]["__text"], "a3");
    assert_eq!(
        map.string_value_for_key_path("channel.item.1.guid._isPermaLink")
            .unwrap(),
        "false"
    );
}

// --- SVG ---

#[test]
fn test_svg() {
    let xml = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
  <circle cx="50" cy="50" r="40" stroke="green" stroke-width="4" fill="yellow"/>
  <rect x="10" y="10" width="30" height="30"/>
  <text x="5" y="95">Hello &lt;SVG&gt;</text>
</svg>"#;

    let map = parse_and_roundtrip(xml);
    assert_eq!(map["_width"], "100");
    assert_eq!(map["circle"]["_stroke-width"], "4");
    assert_eq!(map["rect"]["_x"], "10");
    assert_eq!(map["text"]["__text"], "Hello <SVG>");
    let text = map["text"].as_map().unwrap();
    assert_eq!(text.attributes().unwrap().len(), 2);
}

// --- Maven POM ---

#[test]
fn test_maven_pom() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>demo</artifactId>
  <version>1.0-SNAPSHOT</version>
  <dependencies>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13.2</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
      <version>2.0.9</version>
    </dependency>
  </dependencies>
</project>"#;

    let map = parse_and_roundtrip(xml);
    assert_eq!(map["_xmlns:xsi"], "http://www.w3.org/2001/XMLSchema-instance");
    assert_eq!(map["artifactId"], "demo");
    assert_eq!(
        map.string_value_for_key_path("dependencies.dependency.1.artifactId")
            .unwrap(),
        "slf4j-api"
    );
    assert_eq!(
        map.string_value_for_key_path("dependencies.dependency.0.scope")
            .unwrap(),
        "test"
    );
    // A path ending at several siblings picks the first.
    let first = map
        .dictionary_value_for_key_path("dependencies.dependency")
        .unwrap();
    assert_eq!(first["groupId"], "junit");
}

// --- Android manifest ---

#[test]
fn test_android_manifest() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android"
    package="com.example.app">
    <!-- permissions -->
    <uses-permission android:name="android.permission.INTERNET"/>
    <uses-permission android:name="android.permission.CAMERA"/>
    <application android:label="@string/app_name">
        <activity android:name=".MainActivity" android:exported="true">
            <intent-filter>
                <action android:name="android.intent.action.MAIN"/>
            </intent-filter>
        </activity>
    </application>
</manifest>"#;

    let map = parse_and_roundtrip(xml);
    assert_eq!(map["_package"], "com.example.app");
    assert!(map.comments().is_none());
    let permissions = map["uses-permission"].as_list().unwrap();
    assert_eq!(permissions[1]["_android:name"], "android.permission.CAMERA");
    assert_eq!(
        map.value_for_key_path("application.activity.intent-filter.action._android:name")
            .unwrap(),
        "android.intent.action.MAIN"
    );
}

// --- Mixed content and CDATA ---

#[test]
fn test_cdata_script() {
    let xml = "<page><script><![CDATA[if (a < b && c > d) { run(); }]]></script></page>";
    let map = parse_and_roundtrip(xml);
    assert_eq!(map["script"], "if (a < b && c > d) { run(); }");
    assert_eq!(
        to_xml(&map),
        "<page><script>if (a &lt; b &amp;&amp; c &gt; d) { run(); }</script></page>"
    );
}

#[test]
fn test_unicode_content() {
    let xml = "<greetings><ja>こんにちは</ja><ru>Привет</ru><emoji>🦀</emoji></greetings>";
    let map = parse_and_roundtrip(xml);
    assert_eq!(map["ja"], "こんにちは");
    assert_eq!(map["emoji"], Value::from("🦀"));
}
