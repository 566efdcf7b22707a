//! Model responses in every shape the extractor handles

/// `### FILE:` headers, each wrapping a fence, with chatter around them
pub const FILE_MARKERS: &str = r#"Here is your habit tracker app! 🎉

### FILE: app/(tabs)/index.tsx
```tsx
import { ThemedText } from '@/components/ThemedText';
import { HabitList } from '@/components/HabitList';

export default function HomeScreen() {
  return <HabitList />;
}
```

### FILE: components/HabitList.tsx
```tsx
import { ThemedView } from '@/components/ThemedView';

export function HabitList() {
  return <ThemedView />;
}
```

### FILE: package.json
```json
{
  "dependencies": {
    "react-native-calendars": "^1.1300.0"
  }
}
```

Let me know if you want reminders too!
"#;

/// Same path emitted twice; the second body must win
pub const DUPLICATE_PATHS: &str = "FILE: app/(tabs)/index.tsx\nexport default function HomeScreen() { return 'v1'; }\nEND FILE\n\nFILE: lib/habits.ts\nexport const habits = [];\nEND FILE\n\nFILE: app/(tabs)/index.tsx\nexport default function HomeScreen() { return 'v2'; }\nEND FILE\n";

/// Hostile paths next to one legitimate file
pub const UNSAFE_PATHS: &str = "FILE: ../../etc/passwd\nroot:x:0:0\nEND FILE\nFILE: <script>alert(1)</script>\nx\nEND FILE\nFILE: app/safe.tsx\nexport default 1;\nEND FILE\n";

/// `[path]` and `[[path]]` headers with closers
pub const BRACKETED: &str = "[app/(tabs)/settings.tsx]\nexport default function SettingsScreen() {\n  return null;\n}\n[END]\n\n[[constants/Strings.ts]]\nexport const TITLE = 'Habits';\n[/constants/Strings.ts]\n";

/// Paths in fence info strings
pub const FENCE_INFO: &str = r#"Here you go:

```tsx app/(tabs)/stats.tsx
export default function StatsScreen() {
  return null;
}
```

```ts title="hooks/useHabits.ts"
export function useHabits() {
  return [];
}
```
"#;

/// Headings and bold lines naming the file above each fence
pub const HEADINGS: &str = r#"## 📱 Screens

### `app/(tabs)/profile.tsx`

```tsx
export default function ProfileScreen() {
  return null;
}
```

**components/Avatar.tsx**
```tsx
export function Avatar() {
  return <Image />;
}
```
"#;

/// Comment headers as the first line inside each fence
pub const COMMENT_HEADERS: &str = r#"```tsx
// app/(tabs)/timer.tsx
import { useTimer } from '@/hooks/useTimer';

export default function TimerScreen() {
  return null;
}
```

```ts
// hooks/useTimer.ts
export function useTimer() {
  return 0;
}
```
"#;

/// Unfenced components with a shared import preamble
pub const DECLARATIONS: &str = r#"Sure! Here's the code:

import React from 'react';
import { View, Text } from 'react-native';

export default function HomeScreen() {
  return (
    <View>
      <Text>Welcome</Text>
    </View>
  );
}

export function StreakBadge({ days }: { days: number }) {
  return <Text>{days} days</Text>;
}
"#;

/// Fences with no names at all
pub const BARE_FENCES: &str = r#"Add these:

```json
{
  "name": "habit-tracker",
  "version": "1.0.0",
  "dependencies": { "zustand": "^4.5.0" }
}
```

```ts
export const useStore = create(() => ({ habits: [] }));
```
"#;

/// Manifest object inline in prose
pub const RAW_MANIFEST: &str = r#"Update dependencies: {"dependencies": {"x": "1.0.0"}}"#;

/// Nothing extractable
pub const REFUSAL: &str = "I'm sorry, I can't generate that app.";

/// Marker blocks for the basic merge scenario
pub const BASIC_SCENARIO: &str = "FILE: screens/home.tsx\nexport default function Home() { return 'new'; }\nEND FILE\n\nFILE: components/Badge.tsx\nexport function Badge() { return null; }\nEND FILE\n";

/// Markers attempting to overwrite structural files
pub const STRUCTURAL_OVERWRITE: &str = "FILE: app/_layout.tsx\nexport default function Broken() {}\nEND FILE\nFILE: components/ThemedText.tsx\nexport function ThemedText() { return 'hijacked'; }\nEND FILE\nFILE: tsconfig.json\n{}\nEND FILE\nFILE: hooks/useTimer.ts\nexport function useTimer() { return 1; }\nEND FILE\n";

/// Manifest in a marker block that is not valid JSON
pub const BROKEN_MANIFEST: &str = "FILE: package.json\n{ \"dependencies\": { \"x\": \n}\nEND FILE\n";
