//! Testing utilities for AppForge workspace
//!
//! Shared fixtures: an Expo Router scaffold baseline and model responses in
//! each shape the extractor understands.

#![allow(missing_docs)]

use appforge_files::FileSet;

pub mod responses;

pub const PACKAGE_JSON: &str = r#"{
  "name": "habit-tracker",
  "main": "expo-router/entry",
  "version": "1.0.0",
  "scripts": {
    "start": "expo start",
    "android": "expo start --android",
    "ios": "expo start --ios"
  },
  "dependencies": {
    "expo": "~52.0.0",
    "expo-router": "~4.0.0",
    "react": "18.3.1",
    "react-native": "0.76.3"
  },
  "devDependencies": {
    "typescript": "^5.3.3"
  },
  "private": true
}
"#;

pub const APP_JSON: &str = r#"{
  "expo": {
    "name": "habit-tracker",
    "slug": "habit-tracker",
    "scheme": "habittracker"
  }
}
"#;

pub const TSCONFIG_JSON: &str = r#"{
  "extends": "expo/tsconfig.base",
  "compilerOptions": { "strict": true, "paths": { "@/*": ["./*"] } }
}
"#;

/// `(path, content)` pairs of the scaffold baseline, in generator order
pub fn expo_baseline_entries() -> Vec<(&'static str, &'static str)> {
    vec![
        ("package.json", PACKAGE_JSON),
        ("app.json", APP_JSON),
        ("tsconfig.json", TSCONFIG_JSON),
        ("babel.config.js", "module.exports = function (api) {\n  api.cache(true);\n  return { presets: ['babel-preset-expo'] };\n};\n"),
        ("app/_layout.tsx", "import { Stack } from 'expo-router';\n\nexport default function RootLayout() {\n  return <Stack />;\n}\n"),
        ("app/(tabs)/_layout.tsx", "import { Tabs } from 'expo-router';\n\nexport default function TabLayout() {\n  return <Tabs />;\n}\n"),
        ("app/(tabs)/index.tsx", "export default function HomeScreen() {\n  return null;\n}\n"),
        ("app/(tabs)/explore.tsx", "export default function TabTwoScreen() {\n  return null;\n}\n"),
        ("app/+not-found.tsx", "export default function NotFoundScreen() {\n  return null;\n}\n"),
        ("components/ThemedText.tsx", "export function ThemedText() {\n  return null;\n}\n"),
        ("components/ThemedView.tsx", "export function ThemedView() {\n  return null;\n}\n"),
        ("components/HelloWave.tsx", "export function HelloWave() {\n  return null;\n}\n"),
        ("components/ParallaxScrollView.tsx", "export default function ParallaxScrollView() {\n  return null;\n}\n"),
        ("components/ui/IconSymbol.tsx", "export function IconSymbol() {\n  return null;\n}\n"),
        ("hooks/useColorScheme.ts", "export { useColorScheme } from 'react-native';\n"),
        ("hooks/useThemeColor.ts", "export function useThemeColor() {\n  return '#000';\n}\n"),
        ("constants/Colors.ts", "export const Colors = { light: {}, dark: {} };\n"),
    ]
}

/// Scaffold baseline as a file set
pub fn expo_baseline() -> FileSet {
    file_set(&expo_baseline_entries())
}

/// File set from literal pairs; panics on an invalid path
pub fn file_set(entries: &[(&str, &str)]) -> FileSet {
    FileSet::try_from_entries(entries.iter().copied()).unwrap()
}

/// Two-file baseline used by the basic merge scenario
pub fn minimal_baseline() -> FileSet {
    file_set(&[("config.json", "{}"), ("screens/home.tsx", "old")])
}
